//! Backend capabilities
//!
//! A backend knows how to address its API and how to authenticate against
//! it. Everything else (retry, pagination, normalization) is shared.

use super::types::Credentials;
use crate::error::{Error, Result};
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use url::Url;

/// URL and auth shaping for one API family
pub trait Backend: Send + Sync {
    /// Short backend name used in logs
    fn name(&self) -> &'static str;

    /// Build the absolute request URL. Absolute `path`s are used as is;
    /// otherwise the path is appended to the credentials' base URL.
    fn build_url(
        &self,
        credentials: &Credentials,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Url> {
        let mut url = if path.starts_with("http://") || path.starts_with("https://") {
            Url::parse(path)?
        } else {
            let base = credentials.url.trim_end_matches('/');
            let path = path.trim_start_matches('/');
            Url::parse(&format!("{base}/{path}"))?
        };

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Headers that authenticate a request
    fn auth_headers(&self, credentials: &Credentials) -> Result<HeaderMap>;
}

fn authorization(value: &str) -> Result<HeaderMap> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|e| Error::invalid_header(format!("authorization: {e}")))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Zendesk API token auth: basic auth with `{email}/token` as the user
#[derive(Debug, Clone, Copy, Default)]
pub struct ZendeskBackend;

impl Backend for ZendeskBackend {
    fn name(&self) -> &'static str {
        "zendesk"
    }

    fn auth_headers(&self, credentials: &Credentials) -> Result<HeaderMap> {
        if credentials.identity.is_empty() {
            return Err(Error::missing_credential("zendesk account email"));
        }
        let raw = format!("{}/token:{}", credentials.identity, credentials.secret);
        let encoded = base64::engine::general_purpose::STANDARD.encode(raw);
        authorization(&format!("Basic {encoded}"))
    }
}

/// Bearer token auth
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerBackend;

impl Backend for BearerBackend {
    fn name(&self) -> &'static str {
        "bearer"
    }

    fn auth_headers(&self, credentials: &Credentials) -> Result<HeaderMap> {
        authorization(&format!("Bearer {}", credentials.secret))
    }
}
