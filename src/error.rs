//! Error types for restcall
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use reqwest::header::HeaderMap;
use thiserror::Error;

/// Coarse failure category, used by callers that only need to branch on the
/// kind of failure rather than its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Connection, DNS, timeout or body-read failure
    Transport,
    /// The backend rejected the credentials (401)
    Authentication,
    /// The backend asked us to slow down (429)
    RateLimited,
    /// Any other non-success status
    ApiStatus,
    /// A body that claimed to be JSON could not be parsed
    MalformedResponse,
    /// Page shapes could not be combined
    Normalization,
    /// The call ran past its deadline
    DeadlineExceeded,
    /// Invalid configuration, retry policy, credentials or arguments
    Config,
    /// Everything else
    Internal,
}

/// The main error type for restcall
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Call Errors
    // ============================================================================
    #[error("Transport failure: {message}")]
    Transport { message: String },

    #[error("Authentication failed (HTTP {status}): {body}")]
    Authentication {
        status: u16,
        headers: HeaderMap,
        body: String,
    },

    #[error("Rate limited (HTTP 429), retry after {retry_after_seconds}s: {body}")]
    RateLimited {
        retry_after_seconds: f64,
        body: String,
    },

    #[error("HTTP {status}: {body}")]
    ApiStatus {
        status: u16,
        headers: HeaderMap,
        body: String,
    },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Cannot normalize pages: {message}")]
    Normalization { message: String },

    #[error("Deadline of {deadline_ms}ms exceeded")]
    DeadlineExceeded { deadline_ms: u64 },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid retry policy: {message}")]
    InvalidRetryPolicy { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing credential: {name}")]
    MissingCredential { name: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid header: {message}")]
    InvalidHeader { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

}

impl Error {
    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create an API status error without response headers
    pub fn api_status(status: u16, body: impl Into<String>) -> Self {
        Self::ApiStatus {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a normalization error
    pub fn normalization(message: impl Into<String>) -> Self {
        Self::Normalization {
            message: message.into(),
        }
    }

    /// Create a retry policy error
    pub fn retry_policy(message: impl Into<String>) -> Self {
        Self::InvalidRetryPolicy {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing credential error
    pub fn missing_credential(name: impl Into<String>) -> Self {
        Self::MissingCredential { name: name.into() }
    }

    /// Create an invalid header error
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Authentication { status, .. } | Error::ApiStatus { status, .. } => {
                Some(*status)
            }
            Error::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Response headers of a rejected attempt, if any
    pub fn headers(&self) -> Option<&HeaderMap> {
        match self {
            Error::Authentication { headers, .. } | Error::ApiStatus { headers, .. } => {
                Some(headers)
            }
            _ => None,
        }
    }

    /// Map this error onto its failure category
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Transport { .. } => FailureKind::Transport,
            Error::Authentication { .. } => FailureKind::Authentication,
            Error::RateLimited { .. } => FailureKind::RateLimited,
            Error::ApiStatus { .. } => FailureKind::ApiStatus,
            Error::MalformedResponse { .. } => FailureKind::MalformedResponse,
            Error::Normalization { .. } => FailureKind::Normalization,
            Error::DeadlineExceeded { .. } => FailureKind::DeadlineExceeded,
            Error::InvalidRetryPolicy { .. }
            | Error::Config { .. }
            | Error::MissingCredential { .. }
            | Error::YamlParse(_)
            | Error::InvalidUrl(_)
            | Error::InvalidHeader { .. } => FailureKind::Config,
            Error::JsonParse(_) | Error::Io(_) => FailureKind::Internal,
        }
    }
}

/// Result type alias for restcall
pub type Result<T> = std::result::Result<T, Error>;
