//! Configuration for parley.
//!
//! Stored as JSON at `.parley/config.json`; every field has a default so a
//! partial (or absent) file still yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::exchange::{ExchangeClient, ExchangeError};

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL of the message-exchange endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bound on how long one exchange may take, in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Whether to show a pending bubble while a reply is in flight.
    #[serde(default = "default_show_pending")]
    pub show_pending: bool,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8000/chat/send_message/".into()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_show_pending() -> bool {
    true
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Build an exchange client from this configuration.
    pub fn exchange_client(&self) -> Result<ExchangeClient, ExchangeError> {
        ExchangeClient::with_timeout(&self.endpoint, Duration::from_secs(self.timeout_seconds))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout_seconds(),
            show_pending: default_show_pending(),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.endpoint, "http://127.0.0.1:8000/chat/send_message/");
        assert_eq!(config.timeout_seconds, 30);
        assert!(config.show_pending);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.timeout_seconds, 30);
        assert!(config.show_pending);

        let config: Config =
            serde_json::from_str(r#"{"endpoint": "http://example.com/chat/"}"#).unwrap();
        assert_eq!(config.endpoint, "http://example.com/chat/");
        assert!(config.show_pending);
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".parley").join("config.json");

        let config = Config {
            endpoint: "http://example.com/chat/".into(),
            timeout_seconds: 5,
            show_pending: false,
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.endpoint, config.endpoint);
        assert_eq!(loaded.timeout_seconds, 5);
        assert!(!loaded.show_pending);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
