//! Tests for the auth module

use super::*;
use base64::Engine;

fn zendesk_credentials() -> Credentials {
    Credentials::new("https://acme.zendesk.com/", "agent@acme.test", "tok123")
}

#[test]
fn test_zendesk_basic_token_auth() {
    let headers = ZendeskBackend
        .auth_headers(&zendesk_credentials())
        .unwrap();

    let expected = base64::engine::general_purpose::STANDARD.encode("agent@acme.test/token:tok123");
    assert_eq!(
        headers.get("authorization").unwrap(),
        format!("Basic {expected}").as_str()
    );
    assert!(headers.get("authorization").unwrap().is_sensitive());
}

#[test]
fn test_zendesk_requires_identity() {
    let creds = Credentials::new("https://acme.zendesk.com", "", "tok");
    let err = ZendeskBackend.auth_headers(&creds).unwrap_err();
    assert!(matches!(err, crate::Error::MissingCredential { .. }));
}

#[test]
fn test_bearer_auth() {
    let creds = Credentials::new("https://api.openai.com", "", "sk-test");
    let headers = BearerBackend.auth_headers(&creds).unwrap();
    assert_eq!(headers.get("authorization").unwrap(), "Bearer sk-test");
}

#[test]
fn test_bearer_rejects_invalid_token() {
    let creds = Credentials::new("https://api.openai.com", "", "bad\ntoken");
    assert!(BearerBackend.auth_headers(&creds).is_err());
}

#[test]
fn test_build_url_joins_base_and_path() {
    let url = ZendeskBackend
        .build_url(&zendesk_credentials(), "/api/v2/tickets/5", &[])
        .unwrap();
    assert_eq!(url.as_str(), "https://acme.zendesk.com/api/v2/tickets/5");
}

#[test]
fn test_build_url_appends_query_in_order() {
    let query = vec![
        ("sort_by".to_string(), "created_at".to_string()),
        ("per_page".to_string(), "100".to_string()),
    ];
    let url = ZendeskBackend
        .build_url(&zendesk_credentials(), "api/v2/tickets", &query)
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://acme.zendesk.com/api/v2/tickets?sort_by=created_at&per_page=100"
    );
}

#[test]
fn test_build_url_keeps_existing_query() {
    let query = vec![("page".to_string(), "2".to_string())];
    let url = ZendeskBackend
        .build_url(&zendesk_credentials(), "/api/v2/users/show_many?ids=1,2", &query)
        .unwrap();
    assert_eq!(url.query(), Some("ids=1,2&page=2"));
}

#[test]
fn test_build_url_absolute_path_wins() {
    let url = BearerBackend
        .build_url(&zendesk_credentials(), "https://other.test/x", &[])
        .unwrap();
    assert_eq!(url.as_str(), "https://other.test/x");
}

#[test]
fn test_build_url_invalid_base() {
    let creds = Credentials::new("not a url", "a", "b");
    assert!(ZendeskBackend.build_url(&creds, "/x", &[]).is_err());
}

#[test]
fn test_credentials_debug_hides_secret() {
    let printed = format!("{:?}", zendesk_credentials());
    assert!(printed.contains("agent@acme.test"));
    assert!(!printed.contains("tok123"));
}

#[test]
fn test_static_provider() {
    let provider = StaticCredentials::new(zendesk_credentials());
    assert_eq!(provider.credentials().unwrap(), zendesk_credentials());
}

#[test]
fn test_env_provider() {
    std::env::set_var("RESTCALL_AUTH_TEST_URL", "https://env.zendesk.com");
    std::env::set_var("RESTCALL_AUTH_TEST_IDENTITY", "env@acme.test");
    std::env::set_var("RESTCALL_AUTH_TEST_SECRET", "envtok");

    let creds = EnvCredentials::new("restcall_auth_test").credentials().unwrap();
    assert_eq!(
        creds,
        Credentials::new("https://env.zendesk.com", "env@acme.test", "envtok")
    );
}

#[test]
fn test_env_provider_missing_secret() {
    std::env::set_var("RESTCALL_AUTH_MISSING_URL", "https://x.test");
    let err = EnvCredentials::new("RESTCALL_AUTH_MISSING")
        .credentials()
        .unwrap_err();
    assert!(err.to_string().contains("RESTCALL_AUTH_MISSING_SECRET"));
}

#[test]
fn test_env_provider_default_url() {
    std::env::set_var("RESTCALL_AUTH_DEFAULT_SECRET", "sk");
    let creds = EnvCredentials::new("RESTCALL_AUTH_DEFAULT")
        .default_url("https://api.openai.com")
        .credentials()
        .unwrap();
    assert_eq!(creds.url, "https://api.openai.com");
    assert_eq!(creds.identity, "");
}
