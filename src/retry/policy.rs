//! Retry policy types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// One entry of a retry whitelist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RetryOnRepr", into = "RetryOnRepr")]
pub enum RetryOn {
    /// Transport failures (always retried; accepted for explicitness)
    Network,
    /// HTTP 429 (always retried; accepted for explicitness)
    RateLimited,
    /// Any 5xx status
    ServerError,
    /// HTTP 401
    Authentication,
    /// Any non-success status other than 401 and 429
    ApiError,
    /// One exact status code
    Status(u16),
}

impl fmt::Display for RetryOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryOn::Network => f.write_str("network"),
            RetryOn::RateLimited => f.write_str("rate-limited"),
            RetryOn::ServerError => f.write_str("server-error"),
            RetryOn::Authentication => f.write_str("authentication"),
            RetryOn::ApiError => f.write_str("api-error"),
            RetryOn::Status(code) => write!(f, "{code}"),
        }
    }
}

impl FromStr for RetryOn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "network" | "transport" => Ok(RetryOn::Network),
            "rate-limited" | "rate-limit" => Ok(RetryOn::RateLimited),
            "server-error" | "5xx" => Ok(RetryOn::ServerError),
            "authentication" | "auth" => Ok(RetryOn::Authentication),
            "api-error" | "api" => Ok(RetryOn::ApiError),
            other => other
                .parse::<u16>()
                .map(RetryOn::Status)
                .map_err(|_| Error::retry_policy(format!("unknown retry condition '{s}'"))),
        }
    }
}

/// Wire form of `RetryOn` in YAML/JSON: a status code or a name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RetryOnRepr {
    Code(u16),
    Name(String),
}

impl TryFrom<RetryOnRepr> for RetryOn {
    type Error = Error;

    fn try_from(repr: RetryOnRepr) -> Result<Self> {
        match repr {
            RetryOnRepr::Code(code) => Ok(RetryOn::Status(code)),
            RetryOnRepr::Name(name) => name.parse(),
        }
    }
}

impl From<RetryOn> for RetryOnRepr {
    fn from(value: RetryOn) -> Self {
        match value {
            RetryOn::Status(code) => RetryOnRepr::Code(code),
            other => RetryOnRepr::Name(other.to_string()),
        }
    }
}

/// Per-call retry policy.
///
/// `max_retries` is the number of extra attempts allowed for a single page;
/// the budget starts over on every new page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    retry_on: HashSet<RetryOn>,
    max_retries: u32,
}

impl RetryPolicy {
    /// Create a validated policy. Success codes cannot be whitelisted.
    pub fn new(retry_on: impl IntoIterator<Item = RetryOn>, max_retries: u32) -> Result<Self> {
        let retry_on: HashSet<RetryOn> = retry_on.into_iter().collect();

        for entry in &retry_on {
            if let RetryOn::Status(code) = entry {
                if (200..300).contains(code) {
                    return Err(Error::retry_policy(format!(
                        "success status {code} cannot be retried"
                    )));
                }
                if !(100..=599).contains(code) {
                    return Err(Error::retry_policy(format!(
                        "{code} is not an HTTP status code"
                    )));
                }
            }
        }

        Ok(Self {
            retry_on,
            max_retries,
        })
    }

    /// Policy that never retries
    pub fn none() -> Self {
        Self::default()
    }

    /// Policy with an empty whitelist but a retry budget. Transport
    /// failures and rate limits are still retried.
    pub fn with_budget(max_retries: u32) -> Self {
        Self {
            retry_on: HashSet::new(),
            max_retries,
        }
    }

    /// Parse a list of textual conditions such as `["server-error", "503"]`
    pub fn from_names<S: AsRef<str>>(names: &[S], max_retries: u32) -> Result<Self> {
        let retry_on = names
            .iter()
            .map(|n| n.as_ref().parse())
            .collect::<Result<Vec<RetryOn>>>()?;
        Self::new(retry_on, max_retries)
    }

    /// Maximum retries per page
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Whitelisted conditions
    pub fn retry_on(&self) -> &HashSet<RetryOn> {
        &self.retry_on
    }

    /// Whether the whitelist contains this entry
    pub fn contains(&self, entry: RetryOn) -> bool {
        self.retry_on.contains(&entry)
    }

    /// Whether a 401 should be retried
    pub fn retries_authentication(&self) -> bool {
        self.contains(RetryOn::Authentication) || self.contains(RetryOn::Status(401))
    }

    /// Whether a non-success status other than 401/429 should be retried
    pub fn retries_status(&self, status: u16) -> bool {
        self.contains(RetryOn::Status(status))
            || self.contains(RetryOn::ApiError)
            || (self.contains(RetryOn::ServerError) && (500..600).contains(&status))
    }
}
