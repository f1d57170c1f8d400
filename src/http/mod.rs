//! HTTP transport module
//!
//! Provides the single-exchange transport used by the request executor.
//!
//! # Features
//!
//! - **Transport trait**: one request, one raw response, no retries
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **reqwest backend**: pooled client with timeout and default headers

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{PreparedRequest, Transport, TransportFailure, TransportResponse};
