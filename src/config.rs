//! Runtime settings
//!
//! Settings are loaded from YAML. Every field has a default, so an empty
//! document is a valid configuration.
//!
//! ```yaml
//! http:
//!   timeout_secs: 30
//!   rate_limit: { requests_per_second: 10, burst_size: 10 }
//! retry:
//!   retry_on: [server-error, 409]
//!   max_retries: 2
//! deadline_secs: 120
//! backends:
//!   zendesk: { env_prefix: ZENDESK }
//! ```

use crate::auth::{Backend, BearerBackend, EnvCredentials, ZendeskBackend};
use crate::client::RestClient;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig, Transport};
use crate::openai::{OpenAiClient, DEFAULT_BASE_URL};
use crate::retry::{RetryOn, RetryPolicy};
use crate::zendesk::ZendeskClient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Top-Level Settings
// ============================================================================

/// Complete settings loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Transport settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Default retry policy
    #[serde(default)]
    pub retry: RetrySettings,

    /// Default bound on each logical call
    #[serde(default)]
    pub deadline_secs: Option<u64>,

    /// Per-backend credential sources
    #[serde(default)]
    pub backends: BackendsSettings,
}

impl Settings {
    /// Default call deadline
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }

    /// Generic client with this file's retry policy and deadline
    pub fn rest_client<B: Backend>(
        &self,
        backend: B,
        source: &BackendSettings,
        transport: Arc<dyn Transport>,
    ) -> Result<RestClient<B>> {
        let mut client = RestClient::new(backend, Arc::new(source.provider()), transport)
            .with_retry_policy(self.retry.to_policy()?);
        if let Some(deadline) = self.deadline() {
            client = client.with_deadline(deadline);
        }
        Ok(client)
    }

    /// Zendesk client
    pub fn zendesk_client(&self, transport: Arc<dyn Transport>) -> Result<ZendeskClient> {
        self.rest_client(ZendeskBackend, &self.backends.zendesk, transport)
            .map(ZendeskClient::from_client)
    }

    /// OpenAI client
    pub fn openai_client(&self, transport: Arc<dyn Transport>) -> Result<OpenAiClient> {
        self.rest_client(BearerBackend, &self.backends.openai, transport)
            .map(OpenAiClient::from_client)
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// Transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSettings {
    /// Per-exchange timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Client-side rate limit
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_timeout() -> u64 {
    30
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: None,
            rate_limit: None,
            headers: BTreeMap::new(),
        }
    }
}

impl HttpSettings {
    /// Transport configuration
    pub fn client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder().timeout(Duration::from_secs(self.timeout_secs));
        if let Some(ref agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(ref limit) = self.rate_limit {
            builder = builder.rate_limit(limit.clone());
        }
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }
        builder.build()
    }

    /// Build the reqwest transport
    pub fn build_transport(&self) -> Result<HttpClient> {
        HttpClient::with_config(self.client_config())
    }
}

// ============================================================================
// Retry
// ============================================================================

/// Default retry policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySettings {
    /// Conditions to retry
    #[serde(default)]
    pub retry_on: Vec<RetryOn>,

    /// Retries per page
    #[serde(default)]
    pub max_retries: u32,
}

impl RetrySettings {
    /// Validate into a policy
    pub fn to_policy(&self) -> Result<RetryPolicy> {
        RetryPolicy::new(self.retry_on.iter().copied(), self.max_retries)
    }
}

// ============================================================================
// Backends
// ============================================================================

/// Credential source for one backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendSettings {
    /// Environment variable prefix (`{PREFIX}_URL`, `_IDENTITY`, `_SECRET`)
    pub env_prefix: String,

    /// Base URL when `{PREFIX}_URL` is unset
    #[serde(default)]
    pub base_url: Option<String>,
}

impl BackendSettings {
    /// Credential provider for this backend
    pub fn provider(&self) -> EnvCredentials {
        let provider = EnvCredentials::new(&self.env_prefix);
        match self.base_url {
            Some(ref url) => provider.default_url(url),
            None => provider,
        }
    }
}

/// All backends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendsSettings {
    /// Zendesk credentials
    #[serde(default = "default_zendesk")]
    pub zendesk: BackendSettings,

    /// OpenAI credentials
    #[serde(default = "default_openai")]
    pub openai: BackendSettings,
}

fn default_zendesk() -> BackendSettings {
    BackendSettings {
        env_prefix: "ZENDESK".to_string(),
        base_url: None,
    }
}

fn default_openai() -> BackendSettings {
    BackendSettings {
        env_prefix: "OPENAI".to_string(),
        base_url: Some(DEFAULT_BASE_URL.to_string()),
    }
}

impl Default for BackendsSettings {
    fn default() -> Self {
        Self {
            zendesk: default_zendesk(),
            openai: default_openai(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load settings from a YAML file
pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::config(format!("Settings file '{}' not found", path.display()))
        } else {
            Error::Io(e)
        }
    })?;
    load_settings_from_str(&content)
}

/// Parse settings from a YAML string and validate the retry policy
pub fn load_settings_from_str(yaml: &str) -> Result<Settings> {
    let settings: Settings = if yaml.trim().is_empty() {
        Settings::default()
    } else {
        serde_yaml::from_str(yaml)?
    };
    settings.retry.to_policy()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = load_settings_from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.http.timeout_secs, 30);
        assert_eq!(settings.retry.to_policy().unwrap(), RetryPolicy::none());
        assert_eq!(settings.backends.zendesk.env_prefix, "ZENDESK");
        assert_eq!(
            settings.backends.openai.base_url.as_deref(),
            Some(DEFAULT_BASE_URL)
        );
        assert!(settings.deadline().is_none());
    }

    #[test]
    fn test_full_document() {
        let yaml = r"
http:
  timeout_secs: 5
  user_agent: kbase/1.0
  rate_limit:
    requests_per_second: 3
    burst_size: 6
  headers:
    X-Team: support
retry:
  retry_on: [server-error, 409, rate-limited]
  max_retries: 2
deadline_secs: 90
backends:
  zendesk:
    env_prefix: ZD
    base_url: https://acme.zendesk.com
";
        let settings = load_settings_from_str(yaml).unwrap();

        assert_eq!(settings.http.timeout_secs, 5);
        assert_eq!(settings.deadline(), Some(Duration::from_secs(90)));

        let policy = settings.retry.to_policy().unwrap();
        assert_eq!(policy.max_retries(), 2);
        assert!(policy.contains(RetryOn::Status(409)));
        assert!(policy.contains(RetryOn::ServerError));

        let client = settings.http.client_config();
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.user_agent, "kbase/1.0");
        assert_eq!(client.rate_limit, Some(RateLimiterConfig::new(3, 6)));
        assert_eq!(
            client.default_headers,
            vec![("X-Team".to_string(), "support".to_string())]
        );
        assert!(settings.http.build_transport().is_ok());

        assert_eq!(settings.backends.zendesk.env_prefix, "ZD");
        assert_eq!(settings.backends.openai.env_prefix, "OPENAI");
    }

    #[test]
    fn test_success_code_in_retry_list_is_rejected() {
        let err = load_settings_from_str("retry: { retry_on: [200], max_retries: 1 }").unwrap_err();
        assert!(matches!(err, Error::InvalidRetryPolicy { .. }));
    }

    #[test]
    fn test_negative_max_retries_is_rejected() {
        assert!(load_settings_from_str("retry: { max_retries: -1 }").is_err());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = load_settings_from_str("retries: 3").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_rest_client_uses_configured_policy() {
        let settings =
            load_settings_from_str("retry: { retry_on: [503], max_retries: 3 }\ndeadline_secs: 10")
                .unwrap();
        let transport: Arc<dyn Transport> = Arc::new(HttpClient::new().unwrap());

        let client = settings
            .rest_client(ZendeskBackend, &settings.backends.zendesk, transport)
            .unwrap();
        let printed = format!("{client:?}");
        assert!(printed.contains("max_retries: 3"));
        assert!(printed.contains("10s"));
    }

    #[test]
    fn test_load_settings_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "retry:\n  retry_on: [api-error]\n  max_retries: 4").unwrap();

        let settings = load_settings(file.path()).unwrap();
        assert_eq!(settings.retry.max_retries, 4);
        assert_eq!(settings.retry.retry_on, vec![RetryOn::ApiError]);
    }

    #[test]
    fn test_load_settings_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings(dir.path().join("absent.yaml")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
