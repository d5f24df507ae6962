//! Tests for configuration loading.

use std::collections::HashMap;
use std::time::Duration;
use whodunit::{
    API_KEY_OVERRIDE, ApiConfig, DrainMode, QueueMode, QueueSettings, StorageConfig,
    WhodunitConfig, WhodunitErrorKind,
};

fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("whodunit.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn test_defaults() {
    let config = WhodunitConfig::default();

    assert_eq!(config.api().model(), "gpt-4o-mini");
    assert_eq!(config.api().api_key_env(), "OPENAI_API_KEY");
    assert_eq!(*config.queue().mode(), QueueMode::EventDriven);
    assert_eq!(*config.queue().interval_ms(), 1000);
    assert_eq!(config.storage().database_url(), "whodunit.db");
    assert_eq!(*config.queue_config().drain_mode(), DrainMode::EventDriven);
    assert!(config.queue_config().task_timeout().is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let (_dir, path) = write_config(
        r#"
[api]
model = "local-model"
base_url = "http://localhost:8080/v1/chat/completions"
max_tokens = 2048

[queue]
mode = "polling"
interval_ms = 250
task_timeout_secs = 90
"#,
    );

    let config = WhodunitConfig::load(Some(path.as_path())).unwrap();

    assert_eq!(config.api().model(), "local-model");
    assert_eq!(*config.api().max_tokens(), Some(2048));
    assert_eq!(*config.api().temperature(), Some(0.8));
    assert_eq!(config.storage().database_url(), "whodunit.db");

    let queue = config.queue_config();
    assert_eq!(
        *queue.drain_mode(),
        DrainMode::Polling {
            interval: Duration::from_millis(250)
        }
    );
    assert_eq!(*queue.task_timeout(), Some(Duration::from_secs(90)));
    assert_eq!(*config.generation_settings().max_tokens(), Some(2048));
}

#[test]
fn test_invalid_values_rejected() {
    let (_dir, path) = write_config("[api]\ntemperature = 3.5\n");
    let err = WhodunitConfig::load(Some(path.as_path())).unwrap_err();
    assert!(matches!(err.kind(), WhodunitErrorKind::Config(_)));

    let (_dir, path) = write_config("[queue]\nmode = \"polling\"\ninterval_ms = 0\n");
    assert!(WhodunitConfig::load(Some(path.as_path())).is_err());
}

#[test]
fn test_malformed_toml_is_config_error() {
    let (_dir, path) = write_config("[api\nmodel = ");
    let err = WhodunitConfig::load(Some(path.as_path())).unwrap_err();
    let WhodunitErrorKind::Config(config_err) = err.kind() else {
        panic!("expected a config error, got {err}");
    };
    assert_eq!(config_err.path.as_deref(), Some(path.display().to_string().as_str()));
}

#[test]
fn test_explicit_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(WhodunitConfig::load(Some(dir.path().join("absent.toml").as_path())).is_err());
}

#[test]
fn test_api_key_precedence() {
    let api = ApiConfig::builder()
        .api_key_env("MY_KEY")
        .api_key(Some("from-file".to_string()))
        .build()
        .unwrap();
    let config = WhodunitConfig::new(api, QueueSettings::default(), StorageConfig::default());

    let env: HashMap<&str, &str> = [(API_KEY_OVERRIDE, "override"), ("MY_KEY", "from-env")].into();
    let lookup = |name: &str| env.get(name).map(|v| v.to_string());
    assert_eq!(config.resolve_api_key(lookup).unwrap(), "override");

    let env: HashMap<&str, &str> = [("MY_KEY", "from-env")].into();
    let lookup = |name: &str| env.get(name).map(|v| v.to_string());
    assert_eq!(config.resolve_api_key(lookup).unwrap(), "from-file");

    let bare = WhodunitConfig::new(
        ApiConfig::builder().api_key_env("MY_KEY").build().unwrap(),
        QueueSettings::default(),
        StorageConfig::default(),
    );
    assert_eq!(bare.resolve_api_key(lookup).unwrap(), "from-env");
    assert!(bare.resolve_api_key(|_| None).is_err());
}

#[test]
fn test_blank_api_key_sources_fall_through() {
    let bare = WhodunitConfig::new(
        ApiConfig::builder().api_key_env("MY_KEY").build().unwrap(),
        QueueSettings::default(),
        StorageConfig::default(),
    );
    let env: HashMap<&str, &str> = [(API_KEY_OVERRIDE, ""), ("MY_KEY", "sk-from-env")].into();
    let lookup = |name: &str| env.get(name).map(|v| v.to_string());
    assert_eq!(bare.resolve_api_key(lookup).unwrap(), "sk-from-env");

    let blank_file = WhodunitConfig::new(
        ApiConfig::builder()
            .api_key_env("MY_KEY")
            .api_key(Some("  ".to_string()))
            .build()
            .unwrap(),
        QueueSettings::default(),
        StorageConfig::default(),
    );
    assert_eq!(blank_file.resolve_api_key(lookup).unwrap(), "sk-from-env");

    let env: HashMap<&str, &str> = [(API_KEY_OVERRIDE, " "), ("MY_KEY", "")].into();
    let lookup = |name: &str| env.get(name).map(|v| v.to_string());
    assert!(blank_file.resolve_api_key(lookup).is_err());
}
