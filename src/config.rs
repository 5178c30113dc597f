//! Configuration for the transaction statistics service.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Main configuration for the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Window and eviction settings
    #[serde(default)]
    pub window: WindowConfig,

    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerSettings,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("transaction-statistics")
            .join("config.json")
    }

    /// Reject settings the engine or ticker cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window.validate()
    }
}

/// Window length and eviction schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowConfig {
    /// Length of the validity window in seconds
    pub window_seconds: u64,

    /// How often the eviction ticker fires, in milliseconds
    pub tick_interval_ms: u64,

    /// Delay before the first tick, in milliseconds
    pub tick_initial_delay_ms: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_seconds: 60,
            tick_interval_ms: 1_000,
            tick_initial_delay_ms: 5_000,
        }
    }
}

impl WindowConfig {
    pub fn window_millis(&self) -> i64 {
        i64::try_from(self.window_seconds.saturating_mul(1_000)).unwrap_or(i64::MAX)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn tick_initial_delay(&self) -> Duration {
        Duration::from_millis(self.tick_initial_delay_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_seconds == 0 {
            return Err(ConfigError::Invalid(
                "windowSeconds must be greater than zero".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tickIntervalMs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialize error: {0}")]
    Serialize(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.window.window_seconds, 60);
        assert_eq!(config.window.window_millis(), 60_000);
        assert_eq!(config.window.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.window.tick_initial_delay(), Duration::from_secs(5));
        assert_eq!(config.server.port, 8080);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_window_config_uses_camel_case() {
        let json = serde_json::to_value(WindowConfig::default()).unwrap();
        assert_eq!(json["windowSeconds"], 60);
        assert_eq!(json["tickIntervalMs"], 1000);
        assert_eq!(json["tickInitialDelayMs"], 5000);

        let parsed: WindowConfig = serde_json::from_str(r#"{"windowSeconds": 30}"#).unwrap();
        assert_eq!(parsed.window_seconds, 30);
        assert_eq!(parsed.tick_interval_ms, 1_000);
    }

    #[test]
    fn test_zero_values_rejected() {
        let config = WindowConfig {
            window_seconds: 0,
            ..WindowConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = WindowConfig {
            tick_interval_ms: 0,
            ..WindowConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.window.tick_interval_ms = 250;
        config.server.port = 9000;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }
}
