//! REST client
//!
//! Joins a backend, a credential provider and a transport into the generic
//! call surface: `call(request, retry policy, options)`.

use crate::auth::{Backend, CredentialProvider};
use crate::error::{Error, Result};
use crate::executor::{PreparedRequest, RequestExecutor};
use crate::http::Transport;
use crate::pagination::{CallOptions, CallResult, PaginatedCaller};
use crate::retry::RetryPolicy;
use crate::types::{JsonValue, Method};
use reqwest::header::{HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Immutable description of one logical call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallRequest {
    /// Path relative to the backend base URL, or an absolute URL
    pub path: String,
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
    /// HTTP method
    pub method: Method,
    /// JSON body
    pub body: Option<JsonValue>,
    /// Extra headers
    pub headers: Vec<(String, String)>,
}

impl CallRequest {
    /// Create a request
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            ..Default::default()
        }
    }

    /// GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST request with a JSON body
    pub fn post(path: impl Into<String>, body: JsonValue) -> Self {
        Self::new(Method::POST, path).json(body)
    }

    /// PUT request with a JSON body
    pub fn put(path: impl Into<String>, body: JsonValue) -> Self {
        Self::new(Method::PUT, path).json(body)
    }

    /// DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }
}

/// Generic REST client over one backend
pub struct RestClient<B: Backend> {
    backend: B,
    credentials: Arc<dyn CredentialProvider>,
    caller: PaginatedCaller,
    default_policy: RetryPolicy,
    default_deadline: Option<Duration>,
}

impl<B: Backend> RestClient<B> {
    /// Create a client
    pub fn new(
        backend: B,
        credentials: Arc<dyn CredentialProvider>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            backend,
            credentials,
            caller: PaginatedCaller::new(RequestExecutor::new(transport)),
            default_policy: RetryPolicy::none(),
            default_deadline: None,
        }
    }

    /// Policy used when a call does not pass its own
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    /// Deadline used when a call does not set its own
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.default_deadline = Some(deadline);
        self
    }

    /// The backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Resolve URL, credentials and headers for a request
    pub fn prepare(&self, request: &CallRequest) -> Result<PreparedRequest> {
        let credentials = self.credentials.credentials()?;
        let url = self
            .backend
            .build_url(&credentials, &request.path, &request.query)?;
        let mut headers = self.backend.auth_headers(&credentials)?;

        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (key, value) in &request.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| Error::invalid_header(format!("{key}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::invalid_header(format!("{key}: {e}")))?;
            headers.insert(name, value);
        }
        if request.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Ok(PreparedRequest {
            method: request.method,
            url,
            headers,
            body: request.body.clone(),
        })
    }

    /// Run a logical call
    pub async fn call(
        &self,
        request: CallRequest,
        policy: Option<&RetryPolicy>,
        mut options: CallOptions,
    ) -> Result<CallResult> {
        let prepared = self.prepare(&request)?;
        let policy = policy.unwrap_or(&self.default_policy);
        if options.deadline.is_none() {
            options.deadline = self.default_deadline;
        }

        debug!(
            "[{}] {} {} (paginate: {}, max_retries: {})",
            self.backend.name(),
            prepared.method,
            prepared.url,
            options.paginate,
            policy.max_retries()
        );
        self.caller.call(prepared, policy, &options).await
    }

    /// Run a call and return its normalized value
    pub async fn call_value(&self, request: CallRequest, options: CallOptions) -> Result<JsonValue> {
        self.call(request, None, options).await?.into_value()
    }

    /// GET a single page
    pub async fn get(&self, path: &str) -> Result<JsonValue> {
        self.call_value(CallRequest::get(path), CallOptions::new())
            .await
    }

    /// GET every page and merge them
    pub async fn get_all_pages(&self, path: &str) -> Result<JsonValue> {
        self.call_value(CallRequest::get(path), CallOptions::new().all_pages())
            .await
    }

    /// POST a JSON body
    pub async fn post(&self, path: &str, body: JsonValue) -> Result<JsonValue> {
        self.call_value(CallRequest::post(path, body), CallOptions::new())
            .await
    }

    /// PUT a JSON body
    pub async fn put(&self, path: &str, body: JsonValue) -> Result<JsonValue> {
        self.call_value(CallRequest::put(path, body), CallOptions::new())
            .await
    }

    /// DELETE a resource
    pub async fn delete(&self, path: &str) -> Result<JsonValue> {
        self.call_value(CallRequest::delete(path), CallOptions::new())
            .await
    }
}

impl<B: Backend + std::fmt::Debug> std::fmt::Debug for RestClient<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("backend", &self.backend)
            .field("default_policy", &self.default_policy)
            .field("default_deadline", &self.default_deadline)
            .finish_non_exhaustive()
    }
}
