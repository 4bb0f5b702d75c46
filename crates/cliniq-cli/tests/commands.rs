use cliniq_cli::commands::{ConfigUpdate, parse_edit, read_input};
use cliniq_cli::config::ClientConfig;
use cliniq_core::models::input::RawValue;

#[test]
fn parses_edit_lines() {
    assert_eq!(
        parse_edit("  bmi = 27.5 ").unwrap(),
        Some(("bmi".to_string(), RawValue::Text("27.5".to_string())))
    );
    assert_eq!(
        parse_edit("smoking_history=not current").unwrap(),
        Some((
            "smoking_history".to_string(),
            RawValue::Text("not current".to_string())
        ))
    );
    assert_eq!(parse_edit("age=").unwrap(), Some(("age".to_string(), RawValue::Text(String::new()))));
}

#[test]
fn skips_blank_and_comment_lines() {
    assert_eq!(parse_edit("").unwrap(), None);
    assert_eq!(parse_edit("   # try a lower bmi").unwrap(), None);
}

#[test]
fn rejects_malformed_edits() {
    assert!(parse_edit("bmi 27").is_err());
    assert!(parse_edit("=27").is_err());
}

#[test]
fn reads_mixed_input_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.json");
    std::fs::write(&path, r#"{"age": 61, "hypertension": "Yes", "smoke": true}"#).unwrap();

    let input = read_input(&path).unwrap();
    assert_eq!(input.get("age"), Some(&RawValue::Number(61.0)));
    assert_eq!(input.get("hypertension"), Some(&RawValue::Text("Yes".to_string())));
    assert_eq!(input.get("smoke"), Some(&RawValue::Flag(true)));

    assert!(read_input(&dir.path().join("missing.json")).is_err());
}

#[test]
fn config_update_touches_only_given_values() {
    let base = ClientConfig {
        api_token: Some("tok_abcdefghijk".to_string()),
        ..ClientConfig::default()
    };

    let updated = ConfigUpdate {
        debounce_ms: Some(750),
        ..ConfigUpdate::default()
    }
    .apply(base.clone());
    assert_eq!(updated.debounce_ms, 750);
    assert_eq!(updated.api_token, base.api_token);
    assert_eq!(updated.base_url, base.base_url);

    let cleared = ConfigUpdate {
        clear_token: true,
        ..ConfigUpdate::default()
    }
    .apply(base);
    assert!(cleared.api_token.is_none());
}
