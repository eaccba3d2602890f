use super::*;

const API: &str = "https://api.github.com";

#[test]
fn test_client_new_with_valid_urls() {
    let client = Client::new("https://ghcr.io", API);
    assert!(client.is_ok());
}

#[test]
fn test_client_defaults_to_https_scheme() {
    let client = Client::new("ghcr.io", "api.github.com").unwrap();
    assert_eq!(client.registry_url(), "https://ghcr.io");
    assert_eq!(client.api_url(), "https://api.github.com");
}

#[test]
fn test_client_removes_trailing_slashes() {
    let client = Client::new("https://ghcr.io///", API).unwrap();
    assert_eq!(client.registry_url(), "https://ghcr.io");
}

#[test]
fn test_client_empty_url_fails() {
    assert!(Client::new("", API).is_err());
    assert!(Client::new("   ", API).is_err());
    assert!(Client::new("https://ghcr.io", "").is_err());
}

#[test]
fn test_registry_host_strips_scheme() {
    let client = Client::new("https://ghcr.io", API).unwrap();
    assert_eq!(client.registry_host, "ghcr.io");

    let client = Client::new("http://localhost:5000", API).unwrap();
    assert_eq!(client.registry_host, "localhost:5000");
}

#[test]
fn test_token_response_accepts_either_field() {
    let body: TokenResponse = serde_json::from_str(r#"{"token": "abc"}"#).unwrap();
    assert_eq!(body.token.or(body.access_token).unwrap(), "abc");

    let body: TokenResponse = serde_json::from_str(r#"{"access_token": "xyz"}"#).unwrap();
    assert_eq!(body.token.or(body.access_token).unwrap(), "xyz");

    let body: TokenResponse = serde_json::from_str("{}").unwrap();
    assert!(body.token.or(body.access_token).is_none());
}

#[test]
fn test_tags_response_tolerates_null_tags() {
    let body: TagsResponse = serde_json::from_str(r#"{"name": "acme/web"}"#).unwrap();
    assert!(body.tags.is_empty());
}

#[test]
fn test_package_record_optional_description() {
    let record: PackageRecord = serde_json::from_str(r#"{"name": "web"}"#).unwrap();
    assert!(record.description.is_none());

    let record: PackageRecord =
        serde_json::from_str(r#"{"name": "web", "description": "A web server"}"#).unwrap();
    assert_eq!(record.description.as_deref(), Some("A web server"));
}

#[test]
fn test_client_config_builders() {
    let config = ClientConfig::new().with_timeout(5).with_max_idle_per_host(2);
    assert_eq!(config.timeout_seconds, 5);
    assert_eq!(config.max_idle_per_host, 2);
}

#[tokio::test]
async fn test_fetch_blob_rejects_bad_digest_format() {
    let client = Client::new("https://ghcr.io", API).unwrap();
    let result = client.fetch_blob("acme/web", "not-a-digest", None).await;
    assert!(matches!(result, Err(ScryError::Validation { .. })));
}

#[tokio::test]
async fn test_fetch_blob_rejects_unsupported_algorithm() {
    let client = Client::new("https://ghcr.io", API).unwrap();
    let result = client.fetch_blob("acme/web", "md5:abcd", None).await;
    assert!(matches!(result, Err(ScryError::Validation { .. })));
}
