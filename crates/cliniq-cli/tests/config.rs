use serde_json::json;

use cliniq_cli::config::{
    ClientConfig, DEFAULT_DEBOUNCE_MS, config_info, load_config_from, migrate, save_config_in,
};

#[test]
fn v0_config_gains_debounce_and_version() {
    let v0 = json!({
        "base_url": "https://risk.example.org",
        "created_at": "2025-01-10T12:00:00Z"
    });

    let migrated = migrate(v0, 0).unwrap();
    assert_eq!(migrated["config_version"], json!(1));
    assert_eq!(migrated["debounce_ms"], json!(DEFAULT_DEBOUNCE_MS));

    let config: ClientConfig = serde_json::from_value(migrated).unwrap();
    assert_eq!(config.base_url, "https://risk.example.org");
    assert_eq!(config.timeout_secs, 30);
    assert!(config.api_token.is_none());
}

#[test]
fn migration_keeps_an_existing_debounce() {
    let migrated = migrate(json!({"debounce_ms": 250}), 0).unwrap();
    assert_eq!(migrated["debounce_ms"], json!(250));
}

#[test]
fn newer_version_is_refused() {
    let err = migrate(json!({}), 7).unwrap_err();
    assert!(err.to_string().contains("newer than this build supports"));
}

#[test]
fn non_object_config_is_refused() {
    assert!(migrate(json!([1, 2]), 0).is_err());
}

#[test]
fn save_then_load_restores_the_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig {
        api_token: Some("tok_live_1234567890".to_string()),
        debounce_ms: 300,
        ..ClientConfig::default()
    };

    let path = save_config_in(dir.path(), &config).unwrap();
    assert!(!dir.path().join("config.json.tmp").exists());

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded, config);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn loading_a_v0_file_migrates_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"base_url": "http://10.0.0.5:8000", "timeout_secs": 5, "created_at": "2024-11-02T08:00:00Z"}"#,
    )
    .unwrap();

    let config = load_config_from(&path).unwrap();
    assert_eq!(config.config_version, 1);
    assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
    assert_eq!(config.timeout_secs, 5);
}

#[test]
fn info_redacts_the_token() {
    let mut config = ClientConfig {
        api_token: Some("tok_live_1234567890".to_string()),
        ..ClientConfig::default()
    };
    assert_eq!(config_info(&config).token_hint.as_deref(), Some("tok_...7890"));

    config.api_token = Some("short".to_string());
    assert_eq!(config_info(&config).token_hint.as_deref(), Some("****"));

    config.api_token = None;
    assert!(config_info(&config).token_hint.is_none());
}

#[test]
fn overrides_replace_url_and_token_but_skip_empty_values() {
    let config = ClientConfig::default().with_overrides(|key| match key {
        "CLINIQ_BASE_URL" => Some("https://staging.example.org".to_string()),
        "CLINIQ_API_TOKEN" => Some(String::new()),
        _ => None,
    });

    assert_eq!(config.base_url, "https://staging.example.org");
    assert!(config.api_token.is_none());
    assert_eq!(config.oracle_config().base_url, "https://staging.example.org");
    assert_eq!(config.debounce().as_millis(), 500);
}
