// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # restcall
//!
//! A generic REST call core: one logical call becomes one or more HTTP
//! exchanges with per-page retry, cursor pagination and merging of the
//! page bodies into a single value.
//!
//! ## Features
//!
//! - **Attempt classification**: every exchange is a success, a retryable failure or a fatal error
//! - **Per-page retry budget**: `Retry-After` aware, reset on every accepted page
//! - **Cursor pagination**: follows `next_page`, with the incremental export cap
//! - **Normalization**: list fields concatenated, scalars last-page-wins
//! - **Backends**: Zendesk API token auth and bearer-token APIs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use restcall::auth::{EnvCredentials, ZendeskBackend};
//! use restcall::client::{CallRequest, RestClient};
//! use restcall::http::HttpClient;
//! use restcall::pagination::CallOptions;
//! use restcall::retry::{RetryOn, RetryPolicy};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> restcall::Result<()> {
//!     let client = RestClient::new(
//!         ZendeskBackend,
//!         Arc::new(EnvCredentials::new("ZENDESK")),
//!         Arc::new(HttpClient::new()?),
//!     );
//!
//!     let policy = RetryPolicy::new([RetryOn::ServerError], 3)?;
//!     let comments = client
//!         .call(
//!             CallRequest::get("/api/v2/tickets/42/comments"),
//!             Some(&policy),
//!             CallOptions::new().all_pages(),
//!         )
//!         .await?
//!         .into_value()?;
//!
//!     println!("{comments}");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │        RestClient::call(request, retry policy, options)      │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌────────────┬─────────────────┴──┬──────────────┬────────────┐
//! │  Backend   │  PaginatedCaller   │ RequestExec. │ Normalizer │
//! ├────────────┼────────────────────┼──────────────┼────────────┤
//! │ URL build  │ next_page cursor   │ classify     │ merge      │
//! │ Auth       │ per-page budget    │ Retry-After  │ strict     │
//! │            │ deadline           │ decode body  │ shapes     │
//! └────────────┴────────────────────┴──────────────┴────────────┘
//!                                │
//!                      Transport (reqwest + governor)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Retry policy and `Retry-After` parsing
pub mod retry;

/// HTTP transport with rate limiting
pub mod http;

/// Single-attempt execution and classification
pub mod executor;

/// Merging of page bodies
pub mod normalize;

/// Paginated calls with per-page retry
pub mod pagination;

/// Credentials and backends
pub mod auth;

/// Generic REST client
pub mod client;

/// Zendesk resources
pub mod zendesk;

/// OpenAI prompt client
pub mod openai;

/// YAML settings
pub mod config;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod test_support;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, FailureKind, Result};
pub use types::*;

// Re-export commonly used types
pub use client::{CallRequest, RestClient};
pub use pagination::{CallOptions, CallResult, ResultSelector};
pub use retry::{RetryOn, RetryPolicy};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
