//! Integration tests for loading `.review-watch/config.toml`.

use review_watch::config::{ConfigError, WatchConfig};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let config = WatchConfig::load(&dir.path().join("config.toml")).unwrap();

    assert_eq!(config.poll_interval(), Duration::from_secs(600));
    assert_eq!(
        config.endpoint,
        "https://practicum.yandex.ru/api/user_api/homework_statuses/"
    );
    assert_eq!(config.telegram_api_base, "https://api.telegram.org");
    assert_eq!(config.log.level, "info");
}

#[test]
fn file_values_override_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
poll_interval_secs = 120
endpoint = "http://localhost:9000/statuses/"
request_timeout_secs = 15

[log]
file = ""
"#,
    )
    .unwrap();

    let config = WatchConfig::load(&path).unwrap();
    assert_eq!(config.poll_interval_secs, 120);
    assert_eq!(config.endpoint, "http://localhost:9000/statuses/");
    assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
    assert_eq!(config.log.file, PathBuf::new());
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "poll_interval_secs = \"ten minutes\"\n").unwrap();

    let err = WatchConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"));
}
