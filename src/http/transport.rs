//! Transport abstraction
//!
//! A `Transport` performs exactly one HTTP exchange. It never retries and
//! never interprets status codes; that is the executor's job.

use crate::types::{JsonValue, Method};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_TYPE, LOCATION};
use reqwest::StatusCode;
use std::fmt;
use url::Url;

/// A fully prepared request: absolute URL, auth headers already attached
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL including query string
    pub url: Url,
    /// Headers (auth, content type, extras)
    pub headers: HeaderMap,
    /// Optional JSON body
    pub body: Option<JsonValue>,
}

impl PreparedRequest {
    /// Same request against a different URL (used for follow-up pages)
    #[must_use]
    pub fn with_url(&self, url: Url) -> Self {
        Self {
            url,
            ..self.clone()
        }
    }
}

/// Raw response of one exchange
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// Status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body bytes
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a response
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Lower-cased media type without parameters
    pub fn content_type(&self) -> Option<String> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| {
                v.split(';')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_ascii_lowercase()
            })
    }

    /// Value of the `Location` header
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    /// Canonical reason phrase for the status
    pub fn reason(&self) -> &'static str {
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("")
    }

    /// Body as text, lossily decoded
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Failure before a status line was received, or while reading the body
#[derive(Debug, Clone)]
pub struct TransportFailure {
    /// Human-readable cause
    pub message: String,
    /// Whether the failure was a timeout
    pub timeout: bool,
}

impl TransportFailure {
    /// Create a non-timeout failure
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timeout: false,
        }
    }

    /// Create a timeout failure
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timeout: true,
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.timeout {
            write!(f, "timeout: {}", self.message)
        } else {
            f.write_str(&self.message)
        }
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            timeout: err.is_timeout(),
        }
    }
}

/// One HTTP exchange
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the raw response
    async fn execute(
        &self,
        request: &PreparedRequest,
    ) -> std::result::Result<TransportResponse, TransportFailure>;
}
