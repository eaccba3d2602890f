use super::*;

#[test]
fn test_network_error_display() {
    let err = ScryError::network("connection refused");
    assert_eq!(err.to_string(), "Network error: connection refused");
}

#[test]
fn test_network_error_with_source() {
    let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
    let err = ScryError::network_with_source("failed to connect", io_err);
    assert!(matches!(err, ScryError::Network { source: Some(_), .. }));
}

#[test]
fn test_authentication_error_display() {
    let err = ScryError::authentication("token rejected", Some(401));
    assert_eq!(
        err.to_string(),
        "Authentication error (status: Some(401)): token rejected"
    );
}

#[test]
fn test_not_found_error_display() {
    let err = ScryError::not_found("repository", "acme/web");
    assert_eq!(err.to_string(), "repository not found: acme/web");
}

#[test]
fn test_rate_limit_error() {
    let err = ScryError::rate_limit("slow down", Some(60));
    assert!(matches!(
        err,
        ScryError::RateLimit {
            retry_after: Some(60),
            ..
        }
    ));
}

#[test]
fn test_server_error_display() {
    let err = ScryError::server("boom", 503);
    assert_eq!(err.to_string(), "Server error (status: 503): boom");
}

#[test]
fn test_validation_error_display() {
    let err = ScryError::validation("malformed manifest");
    assert_eq!(err.to_string(), "Validation error: malformed manifest");
}

#[test]
fn test_config_error_carries_path() {
    let err = ScryError::config("bad settings", Some("/etc/scry.yaml"));
    match err {
        ScryError::Config { path, .. } => assert_eq!(path.as_deref(), Some("/etc/scry.yaml")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_errors_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ScryError>();
}

#[test]
fn test_source_chain_is_preserved() {
    use std::error::Error;

    let io_err = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad bytes");
    let err = ScryError::validation_with_source("parse failed", io_err);
    let source = err.source().expect("source should be present");
    assert!(source.to_string().contains("bad bytes"));
}
