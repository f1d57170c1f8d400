//! Pagination types
//!
//! Per-call options, the per-page result selector, the cursor, and the
//! mutable state owned by one paginated call.

use crate::error::{Error, Result};
use crate::executor::PageResponse;
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Substring that identifies an incremental export cursor
pub const INCREMENTAL_MARKER: &str = "incremental";

/// Incremental export pages smaller than this are the last page
pub const INCREMENTAL_PAGE_SIZE: u64 = 1000;

// ============================================================================
// Result Selector
// ============================================================================

/// What to capture from each page when full responses are not requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSelector {
    /// Body if truthy, else the `Location` header, else the reason phrase
    #[default]
    Auto,
    /// Decoded body
    Content,
    /// Status code
    StatusCode,
    /// `Location` header
    Location,
    /// All headers as an object
    Headers,
}

impl ResultSelector {
    /// Extract the selected value from a page
    pub fn select(&self, page: &PageResponse) -> JsonValue {
        match self {
            ResultSelector::Auto => {
                if page.content.is_truthy() {
                    page.content.to_value()
                } else if let Some(location) = page.location() {
                    JsonValue::String(location.to_string())
                } else {
                    JsonValue::String(page.reason.clone())
                }
            }
            ResultSelector::Content => page.content.to_value(),
            ResultSelector::StatusCode => JsonValue::from(page.status),
            ResultSelector::Location => page
                .location()
                .map_or(JsonValue::Null, |l| JsonValue::String(l.to_string())),
            ResultSelector::Headers => page.headers_json(),
        }
    }
}

impl FromStr for ResultSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(ResultSelector::Auto),
            "content" => Ok(ResultSelector::Content),
            "code" | "status" | "status_code" => Ok(ResultSelector::StatusCode),
            "location" => Ok(ResultSelector::Location),
            "headers" => Ok(ResultSelector::Headers),
            other => Err(Error::config(format!("Unknown result selector: {other}"))),
        }
    }
}

// ============================================================================
// Call Options
// ============================================================================

/// Per-call pagination and result options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Follow `next_page` cursors
    pub paginate: bool,
    /// Return every page's full response, skipping normalization
    pub full_response: bool,
    /// What to capture per page
    pub selector: ResultSelector,
    /// Stop after this many pages
    pub max_pages: Option<usize>,
    /// Bound on the whole call, including backoff sleeps
    pub deadline: Option<Duration>,
    /// Fail instead of returning unmerged pages when shapes are mixed
    pub strict_shapes: bool,
}

impl CallOptions {
    /// Create default options (single page, auto selector)
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow cursors across all pages
    #[must_use]
    pub fn all_pages(mut self) -> Self {
        self.paginate = true;
        self
    }

    /// Capture full responses
    #[must_use]
    pub fn full_response(mut self) -> Self {
        self.full_response = true;
        self
    }

    /// Set the result selector
    #[must_use]
    pub fn selector(mut self, selector: ResultSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Stop after `max` pages
    #[must_use]
    pub fn max_pages(mut self, max: usize) -> Self {
        self.max_pages = Some(max);
        self
    }

    /// Bound the whole call
    #[must_use]
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Surface mixed page shapes as an error
    #[must_use]
    pub fn strict_shapes(mut self) -> Self {
        self.strict_shapes = true;
        self
    }
}

// ============================================================================
// Cursor
// ============================================================================

/// Next-page cursor derived from a page body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    /// Next page path or URL; `None` is terminal
    pub next: Option<String>,
}

impl PageCursor {
    /// Terminal cursor
    pub fn done() -> Self {
        Self { next: None }
    }

    /// Derive the cursor from a page.
    ///
    /// Only JSON object bodies carry a cursor, read from `next_page`.
    /// Incremental export cursors are dropped when the page's `count` is
    /// below the export page size.
    pub fn from_page(page: &PageResponse) -> Self {
        let Some(body) = page.content.as_object() else {
            return Self::done();
        };

        let next = body
            .get("next_page")
            .and_then(JsonValue::as_str)
            .filter(|next| !next.is_empty());

        let Some(next) = next else {
            return Self::done();
        };

        if next.contains(INCREMENTAL_MARKER) {
            let count = body.get("count").and_then(JsonValue::as_f64);
            if count.is_some_and(|c| c < INCREMENTAL_PAGE_SIZE as f64) {
                return Self::done();
            }
        }

        Self {
            next: Some(next.to_string()),
        }
    }

    /// Check if this cursor ends pagination
    pub fn is_done(&self) -> bool {
        self.next.is_none()
    }
}

// ============================================================================
// State
// ============================================================================

/// Mutable state of one paginated call
#[derive(Debug, Clone)]
pub struct PaginationState {
    /// URL of the page being fetched
    pub current_url: Url,
    /// Failed attempts on the current page
    pub attempts_on_current_page: u32,
    /// Selected value of each accepted page
    pub pages: Vec<JsonValue>,
    /// Full responses, kept only when requested
    pub responses: Vec<PageResponse>,
    /// Cursor derived from the last accepted page
    pub cursor: PageCursor,
    /// Accepted page count
    pub pages_fetched: usize,
}

impl PaginationState {
    /// Start a call at `url`
    pub fn new(url: Url) -> Self {
        Self {
            current_url: url,
            attempts_on_current_page: 0,
            pages: Vec::new(),
            responses: Vec::new(),
            cursor: PageCursor::default(),
            pages_fetched: 0,
        }
    }

    /// Record an accepted page and reset the retry budget
    pub fn accept(&mut self, page: PageResponse, options: &CallOptions) {
        self.attempts_on_current_page = 0;
        self.pages_fetched += 1;
        self.cursor = PageCursor::from_page(&page);

        if options.full_response {
            self.responses.push(page);
        } else {
            self.pages.push(options.selector.select(&page));
        }
    }

    /// Move to the next page URL
    pub fn advance(&mut self, url: Url) {
        self.current_url = url;
        self.attempts_on_current_page = 0;
    }
}

// ============================================================================
// Result
// ============================================================================

/// Result of a logical call
#[derive(Debug, Clone)]
pub enum CallResult {
    /// Normalized value
    Value(JsonValue),
    /// Every page's full response, in order
    Responses(Vec<PageResponse>),
}

impl CallResult {
    /// The normalized value, if this is one
    pub fn as_value(&self) -> Option<&JsonValue> {
        match self {
            CallResult::Value(value) => Some(value),
            CallResult::Responses(_) => None,
        }
    }

    /// The normalized value, or an error for full-response results
    pub fn into_value(self) -> Result<JsonValue> {
        match self {
            CallResult::Value(value) => Ok(value),
            CallResult::Responses(_) => Err(Error::config(
                "call returned full responses, not a normalized value",
            )),
        }
    }

    /// JSON rendering of either form
    pub fn to_json(&self) -> JsonValue {
        match self {
            CallResult::Value(value) => value.clone(),
            CallResult::Responses(pages) => {
                JsonValue::Array(pages.iter().map(PageResponse::to_json).collect())
            }
        }
    }
}
