//! Retry policy module
//!
//! Decides which failures are retried within a page and how long to wait
//! before the next attempt.
//!
//! # Features
//!
//! - **Explicit per-call policy**: `RetryPolicy` travels with the call, no shared state
//! - **Whitelist by kind or code**: network, rate limit, server error, auth, any API error, or an exact status
//! - **Retry-After parsing**: delta-seconds (fractional allowed) and HTTP-date forms

mod backoff;
mod policy;

pub use backoff::{parse_retry_after, retry_after_from_headers};
pub use policy::{RetryOn, RetryPolicy};
