//! Configuration loading, validation, and management for Numina.
//!
//! Loads configuration from `~/.numina/config.toml` with environment
//! variable overrides. Validates all settings at startup.

pub mod preferences;

pub use preferences::{
    ConsentRecord, PreferenceError, PreferenceStore, Preferences, ThemeColors, ThemePatch,
};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Names accepted by `chatbot.history_window`.
pub const HISTORY_WINDOWS: [&str; 5] = ["week", "2weeks", "month", "6months", "year"];

/// The root configuration structure.
///
/// Maps directly to `~/.numina/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Remote conversational-AI backend
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Chat behaviour
    #[serde(default)]
    pub chatbot: ChatbotConfig,

    /// Persisted theme and consent
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Origin allowed by CORS
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,

    /// Requests per client per minute (0 disables limiting)
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,
}

fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_allowed_origin() -> String {
    "http://localhost:3000".into()
}
fn default_rate_limit() -> u32 {
    60
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allowed_origin: default_allowed_origin(),
            rate_limit_per_minute: default_rate_limit(),
        }
    }
}

/// Connection settings for the remote assistant (Watson Assistant v2 style).
#[derive(Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_id: Option<String>,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Fixed user identifier sent with every turn
    #[serde(default = "default_user_id")]
    pub user_id: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_version() -> String {
    "2021-11-27".into()
}
fn default_user_id() -> String {
    "numina-user".into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            service_url: None,
            assistant_id: None,
            environment_id: None,
            api_version: default_api_version(),
            api_key: None,
            user_id: default_user_id(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AssistantConfig {
    /// True when every value needed to reach the backend is present.
    pub fn is_configured(&self) -> bool {
        self.service_url.is_some()
            && self.assistant_id.is_some()
            && self.environment_id.is_some()
            && self.api_key.is_some()
    }

    /// Names of the settings that are still missing.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.service_url.is_none() {
            missing.push("service_url");
        }
        if self.assistant_id.is_none() {
            missing.push("assistant_id");
        }
        if self.environment_id.is_none() {
            missing.push("environment_id");
        }
        if self.api_key.is_none() {
            missing.push("api_key");
        }
        missing
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("service_url", &self.service_url)
            .field("assistant_id", &self.assistant_id)
            .field("environment_id", &self.environment_id)
            .field("api_version", &self.api_version)
            .field("api_key", &redact(&self.api_key))
            .field("user_id", &self.user_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatbotConfig {
    /// Strategy for typed free text: "remote" or "local"
    #[serde(default = "default_free_text")]
    pub free_text: String,

    #[serde(default = "default_typing_delay_min")]
    pub typing_delay_min_ms: u64,

    #[serde(default = "default_typing_delay_max")]
    pub typing_delay_max_ms: u64,

    /// Default history filter
    #[serde(default = "default_history_window")]
    pub history_window: String,
}

fn default_free_text() -> String {
    "remote".into()
}
fn default_typing_delay_min() -> u64 {
    800
}
fn default_typing_delay_max() -> u64 {
    1600
}
fn default_history_window() -> String {
    "month".into()
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            free_text: default_free_text(),
            typing_delay_min_ms: default_typing_delay_min(),
            typing_delay_max_ms: default_typing_delay_max(),
            history_window: default_history_window(),
        }
    }
}

impl ChatbotConfig {
    pub fn uses_remote_free_text(&self) -> bool {
        self.free_text == "remote"
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Override for the preferences file location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.numina/config.toml).
    ///
    /// Environment variables override file values:
    /// - `WATSON_SERVICE_URL` / `NUMINA_ASSISTANT_URL`
    /// - `WATSON_ASSISTANT_ID`, `WATSON_ENVIRONMENT_ID`, `WATSON_API_VERSION`
    /// - `WATSON_API_KEY` / `NUMINA_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup` (first hit wins per setting).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| keys.iter().find_map(|k| lookup(*k).filter(|v| !v.is_empty()));

        if let Some(url) = first(&["WATSON_SERVICE_URL", "NUMINA_ASSISTANT_URL"]) {
            self.assistant.service_url = Some(url);
        }
        if let Some(id) = first(&["WATSON_ASSISTANT_ID"]) {
            self.assistant.assistant_id = Some(id);
        }
        if let Some(id) = first(&["WATSON_ENVIRONMENT_ID"]) {
            self.assistant.environment_id = Some(id);
        }
        if let Some(version) = first(&["WATSON_API_VERSION"]) {
            self.assistant.api_version = version;
        }
        if let Some(key) = first(&["WATSON_API_KEY", "NUMINA_API_KEY"]) {
            self.assistant.api_key = Some(key);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".numina")
    }

    /// Where preferences are persisted.
    pub fn preferences_path(&self) -> PathBuf {
        self.preferences
            .path
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("preferences.json"))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.port == 0 {
            return Err(ConfigError::ValidationError("gateway.port must be non-zero".into()));
        }

        if self.chatbot.typing_delay_min_ms > self.chatbot.typing_delay_max_ms {
            return Err(ConfigError::ValidationError(
                "typing_delay_min_ms must not exceed typing_delay_max_ms".into(),
            ));
        }

        if !matches!(self.chatbot.free_text.as_str(), "remote" | "local") {
            return Err(ConfigError::ValidationError(format!(
                "chatbot.free_text must be \"remote\" or \"local\", got \"{}\"",
                self.chatbot.free_text
            )));
        }

        if !HISTORY_WINDOWS.contains(&self.chatbot.history_window.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "chatbot.history_window must be one of {}",
                HISTORY_WINDOWS.join(", ")
            )));
        }

        if self.assistant.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "assistant.timeout_secs must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.gateway.port, 3000);
        assert_eq!(config.chatbot.free_text, "remote");
        assert_eq!(config.assistant.api_version, "2021-11-27");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(parsed.chatbot.history_window, "month");
    }

    #[test]
    fn inverted_typing_delay_rejected() {
        let mut config = AppConfig::default();
        config.chatbot.typing_delay_min_ms = 2000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_free_text_mode_rejected() {
        let mut config = AppConfig::default();
        config.chatbot.free_text = "hybrid".into();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn unknown_history_window_rejected() {
        let mut config = AppConfig::default();
        config.chatbot.history_window = "fortnight".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.gateway.host, "127.0.0.1");
    }

    #[test]
    fn load_from_file_with_partial_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[gateway]
port = 8080

[chatbot]
free_text = "local"
history_window = "week"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.gateway.rate_limit_per_minute, 60);
        assert!(!config.chatbot.uses_remote_free_text());
        assert_eq!(config.chatbot.typing_delay_max_ms, 1600);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gateway\nport = ").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn env_overrides_fill_assistant_settings() {
        let env: HashMap<&str, &str> = [
            ("NUMINA_ASSISTANT_URL", "https://api.example.com"),
            ("WATSON_ASSISTANT_ID", "a-1"),
            ("WATSON_ENVIRONMENT_ID", "e-1"),
            ("NUMINA_API_KEY", "k-1"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        assert!(!config.assistant.is_configured());
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert!(config.assistant.is_configured());
        assert_eq!(config.assistant.service_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.assistant.api_version, "2021-11-27");
    }

    #[test]
    fn watson_env_var_wins_over_numina_alias() {
        let mut config = AppConfig::default();
        config.apply_env(|k| match k {
            "WATSON_API_KEY" => Some("primary".into()),
            "NUMINA_API_KEY" => Some("alias".into()),
            _ => None,
        });
        assert_eq!(config.assistant.api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn api_key_redacted_in_debug() {
        let mut config = AppConfig::default();
        config.assistant.api_key = Some("super-secret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn missing_fields_lists_what_is_absent() {
        let mut assistant = AssistantConfig::default();
        assistant.api_key = Some("k".into());
        assert_eq!(
            assistant.missing_fields(),
            vec!["service_url", "assistant_id", "environment_id"]
        );
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("3000"));
        assert!(toml_str.contains("remote"));
        assert!(!toml_str.contains("api_key"));
    }

    #[test]
    fn preferences_path_honours_override() {
        let mut config = AppConfig::default();
        config.preferences.path = Some(PathBuf::from("/tmp/prefs.json"));
        assert_eq!(config.preferences_path(), PathBuf::from("/tmp/prefs.json"));
    }
}
