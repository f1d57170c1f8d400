//! Retry-After handling

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::Duration;
use tracing::debug;

/// Parse a `Retry-After` value.
///
/// Accepts delta-seconds (fractional values allowed) or an HTTP-date.
/// Negative and past values clamp to zero. Unparseable or out-of-range
/// values yield `None`.
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();

    if let Ok(seconds) = value.parse::<f64>() {
        return Duration::try_from_secs_f64(seconds.max(0.0)).ok();
    }

    let at = DateTime::parse_from_rfc2822(value).ok()?;
    let delta = at.with_timezone(&Utc) - now;
    Some(delta.to_std().unwrap_or(Duration::ZERO))
}

/// Delay requested by the `Retry-After` header, if any
pub fn retry_after_from_headers(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?;
    let parsed = parse_retry_after(raw, Utc::now());
    if parsed.is_none() {
        debug!("Ignoring unparseable Retry-After value {:?}", raw);
    }
    parsed
}
