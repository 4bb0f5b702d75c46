use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use cliniq_oracle::http::OracleConfig;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

pub const BASE_URL_ENV: &str = "CLINIQ_BASE_URL";
pub const API_TOKEN_ENV: &str = "CLINIQ_API_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Added in v1.
    pub debounce_ms: u64,
    pub created_at: jiff::Timestamp,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            created_at: jiff::Timestamp::now(),
        }
    }
}

impl ClientConfig {
    pub fn oracle_config(&self) -> OracleConfig {
        OracleConfig {
            base_url: self.base_url.clone(),
            api_token: self.api_token.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Apply `CLINIQ_BASE_URL` / `CLINIQ_API_TOKEN` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.is_empty()) {
            self.base_url = url;
        }
        if let Some(token) = lookup(API_TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.api_token = Some(token);
        }
        self
    }
}

/// Redacted config info safe to print.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigInfo {
    pub base_url: String,
    pub timeout_secs: u64,
    pub debounce_ms: u64,
    pub created_at: String,
    pub token_hint: Option<String>,
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("com.cliniq.client"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the saved config, or defaults when none has been saved yet.
pub fn load_config() -> eyre::Result<ClientConfig> {
    let path = config_path()?;
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(ClientConfig::default());
    }
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> eyre::Result<ClientConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: ClientConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update cliniq."
        ));
    }

    // v0 → v1: add debounce_ms
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("debounce_ms")
            .or_insert(serde_json::Value::Number(DEFAULT_DEBOUNCE_MS.into()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added debounce_ms)");
    }

    Ok(json)
}

pub fn save_config(config: &ClientConfig) -> eyre::Result<PathBuf> {
    save_config_in(&config_dir()?, config)
}

/// Write `config.json` into `dir`, returning the file path.
pub fn save_config_in(dir: &Path, config: &ClientConfig) -> eyre::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let path = dir.join("config.json");
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = dir.join("config.json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    // The file may hold an API token
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, &path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(path)
}

pub fn delete_config() -> eyre::Result<()> {
    let path = config_path()?;
    if path.exists() {
        std::fs::remove_file(&path)?;
        tracing::info!(path = %path.display(), "config deleted");
    }
    Ok(())
}

pub fn config_info(config: &ClientConfig) -> ConfigInfo {
    ConfigInfo {
        base_url: config.base_url.clone(),
        timeout_secs: config.timeout_secs,
        debounce_ms: config.debounce_ms,
        created_at: config.created_at.to_string(),
        token_hint: config.api_token.as_deref().map(redact_token),
    }
}

fn redact_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}
