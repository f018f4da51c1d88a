//! YAML configuration for chatcanon
//!
//! One file configures the fetcher, the batch pipeline and logging. Every
//! section is optional and falls back to its defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//!
//! fetch:
//!   enabled: true
//!   timeout_secs: 60
//!   connect_timeout_secs: 10
//!   user_agent: "chatcanon/0.1"
//!
//! pipeline:
//!   parallel: false
//!
//! logging:
//!   level: "info"
//!   json: false
//! ```

use std::fs;
use std::path::Path;

use fetch::{FetchConfig, MAX_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChatCanonConfig {
    /// Configuration format version
    #[serde(default = "default_config_version")]
    pub version: String,

    #[serde(default)]
    pub fetch: FetchYamlConfig,

    #[serde(default)]
    pub pipeline: PipelineYamlConfig,

    #[serde(default)]
    pub logging: LoggingYamlConfig,
}

impl ChatCanonConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: ChatCanonConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.fetch.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

impl Default for ChatCanonConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            fetch: FetchYamlConfig::default(),
            pipeline: PipelineYamlConfig::default(),
            logging: LoggingYamlConfig::default(),
        }
    }
}

/// Merged-history fetch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchYamlConfig {
    /// `false` keeps the pipeline off the network; merged histories then
    /// resolve to the fixed fallback entries.
    #[serde(default = "true_value")]
    pub enabled: bool,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl FetchYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigLoadError::Validation(format!(
                "fetch.timeout_secs must be within 1..={MAX_TIMEOUT_SECS}"
            )));
        }
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > self.timeout_secs {
            return Err(ConfigLoadError::Validation(
                "fetch.connect_timeout_secs must be >= 1 and <= fetch.timeout_secs".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout_secs: self.timeout_secs,
            connect_timeout_secs: self.connect_timeout_secs,
            user_agent: self.user_agent.clone(),
        }
    }
}

impl Default for FetchYamlConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Batch pipeline settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineYamlConfig {
    /// Normalize batches on the rayon pool. Output order is unchanged.
    #[serde(default)]
    pub parallel: bool,
}

/// Logging settings, consumed by the binary only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingYamlConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

impl LoggingYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&self.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigLoadError::Validation(format!(
                "logging.level must be one of: {}",
                valid_levels.join(", ")
            )));
        }
        Ok(())
    }
}

impl Default for LoggingYamlConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value functions
fn default_config_version() -> String {
    "1.0".to_string()
}
fn true_value() -> bool {
    true
}
fn default_timeout_secs() -> u64 {
    FetchConfig::default().timeout_secs
}
fn default_connect_timeout_secs() -> u64 {
    FetchConfig::default().connect_timeout_secs
}
fn default_user_agent() -> String {
    FetchConfig::default().user_agent
}
fn default_log_level() -> String {
    "info".to_string()
}
