//! Loading configuration files from disk.

use std::io::Write;
use std::path::Path;

use fetch_router::config::loader::{load_config, ConfigError};
use fetch_router::http::server::build_fetch;
use fetch_router::http::status_text;

mod common;

#[tokio::test]
async fn test_load_and_serve_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [listener]
        bind_address = "127.0.0.1:0"

        [observability]
        log_level = "debug"

        [[routes]]
        method = "GET"
        url = "hyper://example/ipfs/**"
        body = "ipfs"

        [not_found]
        status = 404
        status_text = "Nothing Here"
        body = "missing"
        "#
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.observability.log_level, "debug");
    assert_eq!(config.routes.len(), 1);

    let fetch = build_fetch(&config).unwrap();
    let response = fetch.fetch("hyper://example/ipfs/cid/file").await.unwrap();
    assert_eq!(common::body_text(response).await, "ipfs");

    let response = fetch.fetch("hyper://example/ipns/name").await.unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(status_text(&response), Some("Nothing Here"));
    assert_eq!(common::body_text(response).await, "missing");
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        load_config(Path::new("/definitely/not/here.toml")),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn test_invalid_file_reports_every_problem() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [timeouts]
        request_secs = 0

        [[routes]]
        url = "http://example.com/**/x"
        "#
    )
    .unwrap();

    match load_config(file.path()) {
        Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
        other => panic!("expected validation errors, got {other:?}"),
    }
}
