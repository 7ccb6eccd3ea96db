//! Monitor configuration
//!
//! Loaded from a YAML file whose path can be overridden through the
//! `MONITOR_CONFIG_PATH` environment variable.

use serde::{Deserialize, Serialize};
use serialink::FixedInterval;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default path used when the environment does not provide one
pub const DEFAULT_CONFIG_PATH: &str = "config/monitor.yaml";

/// Environment variable overriding the config path
pub const CONFIG_PATH_ENV: &str = "MONITOR_CONFIG_PATH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Device to monitor (e.g. `/dev/ttyUSB0`, `COM5`)
    pub device: String,

    #[serde(default = "default_baud")]
    pub baud: u32,

    /// How many samples the monitor retains in memory
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    #[serde(default)]
    pub reconnect: ReconnectConfig,
}

/// Reconnection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconnectConfig {
    /// Seconds between reopen attempts
    pub interval_secs: u64,
    /// Attempt bound; omit for unlimited retries
    pub max_attempts: Option<usize>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3,
            max_attempts: Some(5),
        }
    }
}

fn default_baud() -> u32 {
    9600
}

fn default_history_capacity() -> usize {
    256
}

impl MonitorConfig {
    /// Load configuration from a YAML file
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        let config: MonitorConfig = serde_yaml::from_str(&yaml_content)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.device.trim().is_empty() {
            return Err(ConfigError::ValidationError("device must be set".into()));
        }
        if self.baud == 0 {
            return Err(ConfigError::ValidationError("baud must be non-zero".into()));
        }
        if self.reconnect.interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "reconnect.interval_secs must be non-zero".into(),
            ));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "history_capacity must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Build the retry policy these settings describe
    pub fn retry_policy(&self) -> FixedInterval {
        FixedInterval::new(
            Duration::from_secs(self.reconnect.interval_secs),
            self.reconnect.max_attempts,
        )
    }
}

/// Resolve the config path from the environment or use the default
pub fn config_path_from_env() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
        .into()
}
