//! Credential types and providers

use crate::error::{Error, Result};
use std::fmt;

/// Credentials for one backend. The secret is never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Base URL of the API (e.g. `https://acme.zendesk.com`)
    pub url: String,
    /// Account identity (email, username); may be empty for token-only APIs
    pub identity: String,
    /// API token or password
    pub secret: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(
        url: impl Into<String>,
        identity: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            identity: identity.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("identity", &self.identity)
            .field("secret", &"***")
            .finish()
    }
}

/// Source of credentials, consulted once per call
pub trait CredentialProvider: Send + Sync {
    /// Current credentials
    fn credentials(&self) -> Result<Credentials>;
}

/// Fixed credentials
#[derive(Debug, Clone)]
pub struct StaticCredentials(Credentials);

impl StaticCredentials {
    /// Wrap fixed credentials
    pub fn new(credentials: Credentials) -> Self {
        Self(credentials)
    }
}

impl CredentialProvider for StaticCredentials {
    fn credentials(&self) -> Result<Credentials> {
        Ok(self.0.clone())
    }
}

/// Credentials read from `{PREFIX}_URL`, `{PREFIX}_IDENTITY` and
/// `{PREFIX}_SECRET`. The identity variable is optional.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    prefix: String,
    default_url: Option<String>,
}

impl EnvCredentials {
    /// Read variables with this prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().to_ascii_uppercase(),
            default_url: None,
        }
    }

    /// Use this URL when `{PREFIX}_URL` is unset
    #[must_use]
    pub fn default_url(mut self, url: impl Into<String>) -> Self {
        self.default_url = Some(url.into());
        self
    }

    fn var(&self, suffix: &str) -> Option<String> {
        std::env::var(format!("{}_{suffix}", self.prefix))
            .ok()
            .filter(|v| !v.is_empty())
    }
}

impl CredentialProvider for EnvCredentials {
    fn credentials(&self) -> Result<Credentials> {
        let url = self
            .var("URL")
            .or_else(|| self.default_url.clone())
            .ok_or_else(|| Error::missing_credential(format!("{}_URL", self.prefix)))?;
        let secret = self
            .var("SECRET")
            .ok_or_else(|| Error::missing_credential(format!("{}_SECRET", self.prefix)))?;
        let identity = self.var("IDENTITY").unwrap_or_default();

        Ok(Credentials {
            url,
            identity,
            secret,
        })
    }
}
