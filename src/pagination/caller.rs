//! Paginated caller
//!
//! Drives the executor page by page. The retry budget applies to each page
//! separately and starts over whenever a page is accepted.

use super::types::{CallOptions, CallResult, PaginationState};
use crate::error::{Error, Result};
use crate::executor::{CallOutcome, PreparedRequest, RequestExecutor};
use crate::normalize::{merge, merge_strict};
use crate::retry::RetryPolicy;
use tracing::{debug, info, warn};

/// Runs one logical call across all of its pages
#[derive(Debug, Clone)]
pub struct PaginatedCaller {
    executor: RequestExecutor,
}

impl PaginatedCaller {
    /// Create a caller over an executor
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    /// Run the call, bounded by the options' deadline if one is set
    pub async fn call(
        &self,
        request: PreparedRequest,
        policy: &RetryPolicy,
        options: &CallOptions,
    ) -> Result<CallResult> {
        match options.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.run(request, policy, options))
                .await
                .map_err(|_| {
                    warn!("Call exceeded its {:?} deadline", deadline);
                    Error::DeadlineExceeded {
                        deadline_ms: deadline.as_millis() as u64,
                    }
                })?,
            None => self.run(request, policy, options).await,
        }
    }

    async fn run(
        &self,
        request: PreparedRequest,
        policy: &RetryPolicy,
        options: &CallOptions,
    ) -> Result<CallResult> {
        let mut state = PaginationState::new(request.url.clone());
        let mut current = request;

        loop {
            match self.executor.send(&current, policy).await {
                CallOutcome::Success(page) => {
                    state.accept(page, options);

                    if !options.paginate {
                        break;
                    }
                    if options
                        .max_pages
                        .is_some_and(|max| state.pages_fetched >= max)
                    {
                        debug!("Stopping after {} pages", state.pages_fetched);
                        break;
                    }
                    let Some(next) = state.cursor.next.as_deref() else {
                        break;
                    };

                    let url = state.current_url.join(next)?;
                    debug!("Following next page {}", url);
                    current = current.with_url(url.clone());
                    state.advance(url);
                }
                CallOutcome::Retryable { error, delay } => {
                    state.attempts_on_current_page += 1;
                    if state.attempts_on_current_page > policy.max_retries() {
                        warn!(
                            "Giving up on {} after {} attempt(s): {}",
                            state.current_url, state.attempts_on_current_page, error
                        );
                        return Err(error);
                    }

                    warn!(
                        "{}, attempt {}/{}, waiting {:?}",
                        error,
                        state.attempts_on_current_page,
                        policy.max_retries() + 1,
                        delay
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                CallOutcome::Fatal(error) => return Err(error),
            }
        }

        info!(
            "{} {} completed with {} page(s)",
            current.method, state.current_url, state.pages_fetched
        );
        finish(state, options)
    }
}

fn finish(state: PaginationState, options: &CallOptions) -> Result<CallResult> {
    if options.full_response {
        return Ok(CallResult::Responses(state.responses));
    }

    let value = if options.strict_shapes {
        merge_strict(state.pages)?
    } else {
        merge(state.pages)
    };
    Ok(CallResult::Value(value))
}
