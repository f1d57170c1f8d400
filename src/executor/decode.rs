//! Response body decoding by content type

use super::types::Content;
use crate::error::{Error, Result};
use crate::http::TransportResponse;

/// Decode a response body.
///
/// - blank body: `Content::Empty`
/// - JSON media type (`application/json`, `text/json`, `*+json`): parsed, failure is an error
/// - `text/*`: parsed as JSON when possible, otherwise text
/// - anything else: raw bytes
pub fn decode_body(response: &TransportResponse) -> Result<Content> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Content::Empty);
    }

    let content_type = response.content_type().unwrap_or_default();

    if is_json_media_type(&content_type) {
        return serde_json::from_slice(&response.body)
            .map(Content::Json)
            .map_err(|e| {
                Error::malformed(format!(
                    "HTTP {} declared {content_type} but body is not JSON: {e}",
                    response.status
                ))
            });
    }

    if content_type.starts_with("text/") {
        return Ok(match serde_json::from_slice(&response.body) {
            Ok(value) => Content::Json(value),
            Err(_) => Content::Text(response.text()),
        });
    }

    Ok(Content::Bytes(response.body.clone()))
}

fn is_json_media_type(content_type: &str) -> bool {
    content_type.ends_with("/json") || content_type.ends_with("+json")
}
