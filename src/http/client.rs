//! reqwest-backed transport
//!
//! Provides the production `Transport`:
//! - Shared connection pool and TLS via reqwest
//! - Optional token-bucket rate limiting
//! - Default headers and user agent

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::transport::{PreparedRequest, Transport, TransportFailure, TransportResponse};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Configuration for the reqwest transport
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Per-exchange timeout
    pub timeout: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: Vec<(String, String)>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            rate_limit: None,
            default_headers: Vec::new(),
            user_agent: format!("restcall/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.push((key.into(), value.into()));
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Production transport over a pooled reqwest client
pub struct HttpClient {
    client: Client,
    default_headers: HeaderMap,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a transport with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        let mut default_headers = HeaderMap::new();
        for (key, value) in &config.default_headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| Error::invalid_header(format!("{key}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::invalid_header(format!("{key}: {e}")))?;
            default_headers.insert(name, value);
        }

        Ok(Self {
            client,
            default_headers,
            rate_limiter: config.rate_limit.as_ref().map(RateLimiter::new),
        })
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn execute(
        &self,
        request: &PreparedRequest,
    ) -> std::result::Result<TransportResponse, TransportFailure> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let mut req = self
            .client
            .request(request.method.into(), request.url.clone())
            .headers(self.default_headers.clone())
            .headers(request.headers.clone());

        if let Some(ref body) = request.body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| TransportFailure::new(format!("Failed to encode body: {e}")))?;
            req = req.body(bytes);
        }

        debug!("{} {}", request.method, request.url);
        let response = req.send().await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        debug!("{} {} -> {}", request.method, request.url, status);
        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("default_headers", &self.default_headers)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
