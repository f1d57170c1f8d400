//! Single-attempt request executor

use super::decode::decode_body;
use super::types::{CallOutcome, PageResponse};
use crate::error::Error;
use crate::http::{PreparedRequest, Transport, TransportResponse};
use crate::retry::{retry_after_from_headers, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Status that is accepted as a page even though it is not 2xx
pub const UNPROCESSABLE_ENTITY: u16 = 422;

/// Performs one HTTP attempt and classifies the result
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
}

impl RequestExecutor {
    /// Create an executor over a transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send one attempt and classify it
    pub async fn send(&self, request: &PreparedRequest, policy: &RetryPolicy) -> CallOutcome {
        match self.transport.execute(request).await {
            Ok(response) => classify(request, response, policy),
            Err(failure) => {
                debug!(
                    "{} {} failed before a response: {}",
                    request.method, request.url, failure
                );
                CallOutcome::Retryable {
                    error: Error::transport(failure.to_string()),
                    delay: Duration::ZERO,
                }
            }
        }
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor").finish_non_exhaustive()
    }
}

/// Classify a received response against a retry policy
pub fn classify(
    request: &PreparedRequest,
    response: TransportResponse,
    policy: &RetryPolicy,
) -> CallOutcome {
    let status = response.status;

    if (200..300).contains(&status) || status == UNPROCESSABLE_ENTITY {
        return match decode_body(&response) {
            Ok(content) => {
                debug!("{} {} accepted with {}", request.method, request.url, status);
                CallOutcome::Success(PageResponse {
                    url: request.url.clone(),
                    status,
                    reason: response.reason().to_string(),
                    headers: response.headers,
                    content,
                })
            }
            Err(e) => CallOutcome::Fatal(e),
        };
    }

    let retry_after = retry_after_from_headers(&response.headers);
    let body = response.text();
    let headers = response.headers;

    match status {
        429 => {
            let delay = retry_after.unwrap_or(Duration::ZERO);
            CallOutcome::Retryable {
                error: Error::RateLimited {
                    retry_after_seconds: delay.as_secs_f64(),
                    body,
                },
                delay,
            }
        }
        401 => {
            let error = Error::Authentication {
                status,
                headers,
                body,
            };
            if policy.retries_authentication() {
                CallOutcome::Retryable {
                    error,
                    delay: retry_after.unwrap_or(Duration::ZERO),
                }
            } else {
                CallOutcome::Fatal(error)
            }
        }
        _ => {
            let error = Error::ApiStatus {
                status,
                headers,
                body,
            };
            if policy.retries_status(status) {
                CallOutcome::Retryable {
                    error,
                    delay: retry_after.unwrap_or(Duration::ZERO),
                }
            } else {
                CallOutcome::Fatal(error)
            }
        }
    }
}
