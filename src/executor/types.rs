//! Executor types
//!
//! The decoded page and the per-attempt outcome.

use crate::error::Error;
use crate::types::{is_truthy, JsonObject, JsonValue};
use bytes::Bytes;
use reqwest::header::{HeaderMap, LOCATION};
use serde_json::json;
use std::time::Duration;
use url::Url;

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Parsed JSON document
    Json(JsonValue),
    /// Text body that was not JSON
    Text(String),
    /// Body of any other media type
    Bytes(Bytes),
    /// No body
    Empty,
}

impl Content {
    /// The JSON document, if this body was JSON
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Content::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The JSON object, if this body was a JSON object
    pub fn as_object(&self) -> Option<&JsonObject> {
        self.as_json().and_then(JsonValue::as_object)
    }

    /// Convert into a JSON value. Text and raw bytes become strings,
    /// an empty body becomes null.
    pub fn to_value(&self) -> JsonValue {
        match self {
            Content::Json(value) => value.clone(),
            Content::Text(text) => JsonValue::String(text.clone()),
            Content::Bytes(bytes) => JsonValue::String(String::from_utf8_lossy(bytes).into_owned()),
            Content::Empty => JsonValue::Null,
        }
    }

    /// Truthiness of the decoded body
    pub fn is_truthy(&self) -> bool {
        match self {
            Content::Json(value) => is_truthy(value),
            Content::Text(text) => !text.is_empty(),
            Content::Bytes(bytes) => !bytes.is_empty(),
            Content::Empty => false,
        }
    }
}

/// One accepted page
#[derive(Debug, Clone)]
pub struct PageResponse {
    /// URL the page was fetched from
    pub url: Url,
    /// Status code (2xx or 422)
    pub status: u16,
    /// Canonical reason phrase
    pub reason: String,
    /// Response headers
    pub headers: HeaderMap,
    /// Decoded body
    pub content: Content,
}

impl PageResponse {
    /// Value of the `Location` header
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    /// Headers as a JSON object. Repeated headers are joined with ", ".
    pub fn headers_json(&self) -> JsonValue {
        let mut map = JsonObject::new();
        for name in self.headers.keys() {
            let joined = self
                .headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ");
            map.insert(name.as_str().to_string(), JsonValue::String(joined));
        }
        JsonValue::Object(map)
    }

    /// Full response as JSON, used for `full_response` results
    pub fn to_json(&self) -> JsonValue {
        json!({
            "url": self.url.as_str(),
            "status": self.status,
            "reason": self.reason,
            "headers": self.headers_json(),
            "content": self.content.to_value(),
        })
    }
}

/// Classification of one attempt
#[derive(Debug)]
pub enum CallOutcome {
    /// The page was accepted
    Success(PageResponse),
    /// The attempt failed but may be repeated after `delay`
    Retryable {
        /// Failure to surface once the budget is spent
        error: Error,
        /// Wait before the next attempt
        delay: Duration,
    },
    /// The call must stop with this error
    Fatal(Error),
}

impl CallOutcome {
    /// Check if this is a success
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Check if this is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable { .. })
    }

    /// Check if this is fatal
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}
