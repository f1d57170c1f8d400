//! Request executor module
//!
//! Runs a single HTTP attempt and turns the result into a `CallOutcome`.
//!
//! # Classification
//!
//! - **2xx and 422**: success, body decoded by content type
//! - **429**: always retryable, delay from `Retry-After` (default 0)
//! - **401**: fatal unless the policy whitelists authentication
//! - **Other statuses**: retryable only when whitelisted
//! - **Transport failures**: always retryable with no delay

mod decode;
mod request;
mod types;

pub use crate::http::PreparedRequest;
pub use decode::decode_body;
pub use request::{classify, RequestExecutor, UNPROCESSABLE_ENTITY};
pub use types::{CallOutcome, Content, PageResponse};
