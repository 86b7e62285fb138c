//! Configuration for mealtrack
//!
//! Settings come from defaults, then an optional TOML file, then the
//! environment. Command-line flags are applied last by the binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::DEFAULT_SLOT;

/// Environment variable overriding `data_dir`.
pub const DATA_DIR_ENV: &str = "MEALTRACK_DATA_DIR";

const APP_DIR: &str = "mealtrack";
const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "mealtrack.log";

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Directory holding the storage slots and the log file
    pub data_dir: PathBuf,
    /// Storage slot holding the meal list
    pub slot: String,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Log destination; defaults to `<data_dir>/mealtrack.log`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            slot: DEFAULT_SLOT.to_string(),
            log_filter: "mealtrack=info,mealtrack_core=info".to_string(),
            log_file: None,
        }
    }
}

impl TrackerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve configuration from standard locations.
    ///
    /// An explicit path must exist. Otherwise `<config_dir>/mealtrack/config.toml`
    /// is used when present, falling back to defaults. Environment overrides
    /// are applied in every case.
    pub fn load_standard(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment-style overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|dir| !dir.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
    }

    /// Where log output goes.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(LOG_FILE))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slot.trim().is_empty() {
            return Err(ConfigError::Invalid("slot must not be empty".to_string()));
        }

        if self.slot.contains(['/', '\\']) || self.slot.starts_with('.') {
            return Err(ConfigError::Invalid(format!(
                "slot '{}' must be a plain name",
                self.slot
            )));
        }

        Ok(())
    }
}

/// `<data_dir>/mealtrack`, or `./mealtrack` when the platform has no data dir.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// `<config_dir>/mealtrack/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Invalid config file: {0}")]
    Parse(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}
