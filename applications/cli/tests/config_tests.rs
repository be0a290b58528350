//! Configuration loading tests

use std::io::Write;
use tale_cli::{CliError, TaleConfig};

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn no_env() -> Option<config::Map<String, String>> {
    Some(config::Map::new())
}

#[test]
fn test_defaults_are_valid() {
    let config = TaleConfig::default();

    assert!(config.validate().is_ok());
    assert_eq!(config.server.base_url, "http://localhost:8000");
    assert_eq!(config.playback.volume, 1.0);
    assert_eq!(config.playback.skip_interval_secs, 15.0);
    assert!(config.output.media_controls);
}

#[test]
fn test_load_from_file() {
    let file = config_file(
        r#"
[server]
base_url = "https://tales.example.com"
api_token = "secret"
poll_interval_ms = 500

[playback]
volume = 0.6
playback_rate = 1.25

[output]
media_controls = false
"#,
    );

    let config = TaleConfig::load_with_env(Some(file.path()), no_env()).unwrap();

    assert_eq!(config.server.base_url, "https://tales.example.com");
    assert_eq!(config.server.api_token.as_deref(), Some("secret"));
    assert_eq!(config.server.poll_interval_ms, 500);
    // Unset fields keep their defaults
    assert_eq!(config.server.timeout_secs, 30);
    assert_eq!(config.playback.volume, 0.6);
    assert_eq!(config.playback.playback_rate, 1.25);
    assert_eq!(config.playback.restart_threshold_secs, 3.0);
    assert!(!config.output.media_controls);
}

#[test]
fn test_environment_overrides_file() {
    let file = config_file(
        r#"
[server]
base_url = "https://tales.example.com"
"#,
    );

    let mut env = config::Map::new();
    env.insert(
        "TALE_SERVER__BASE_URL".to_string(),
        "http://127.0.0.1:9000".to_string(),
    );
    env.insert("TALE_PLAYBACK__VOLUME".to_string(), "0.25".to_string());

    let config = TaleConfig::load_with_env(Some(file.path()), Some(env)).unwrap();

    assert_eq!(config.server.base_url, "http://127.0.0.1:9000");
    assert_eq!(config.playback.volume, 0.25);
}

#[test]
fn test_missing_explicit_file_is_error() {
    let result = TaleConfig::load_with_env(
        Some(std::path::Path::new("/nonexistent/tale.toml")),
        no_env(),
    );

    assert!(matches!(result, Err(CliError::Config(_))));
}

#[test]
fn test_rejects_non_http_server() {
    let file = config_file(
        r#"
[server]
base_url = "ftp://tales.example.com"
"#,
    );

    match TaleConfig::load_with_env(Some(file.path()), no_env()) {
        Err(CliError::Config(msg)) => assert!(msg.contains("http://")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_rejects_out_of_range_volume() {
    let mut config = TaleConfig::default();
    config.playback.volume = 1.5;

    match config.validate() {
        Err(CliError::Config(msg)) => assert!(msg.contains("Volume")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_rejects_out_of_range_rate() {
    let mut config = TaleConfig::default();
    config.playback.playback_rate = 8.0;

    assert!(matches!(config.validate(), Err(CliError::Config(_))));
}

#[test]
fn test_rejects_zero_poll_interval() {
    let mut config = TaleConfig::default();
    config.server.poll_interval_ms = 0;

    assert!(matches!(config.validate(), Err(CliError::Config(_))));
}
