//! Pagination module
//!
//! Runs a logical call across pages with a per-page retry budget.
//!
//! # Features
//!
//! - **Cursor pagination**: follows the body's `next_page` until it is absent
//! - **Incremental export cap**: incremental cursors stop once a page holds fewer than 1000 items
//! - **Per-page retry budget**: failed attempts reset on every accepted page
//! - **Result selection**: body, status, location or headers per page, or full responses
//! - **Deadline**: optional bound over sends and backoff sleeps

mod caller;
mod types;

pub use caller::PaginatedCaller;
pub use types::{
    CallOptions, CallResult, PageCursor, PaginationState, ResultSelector, INCREMENTAL_MARKER,
    INCREMENTAL_PAGE_SIZE,
};
