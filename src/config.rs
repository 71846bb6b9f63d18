use crate::{Result, StubError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".stubkit.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub binding: BindingConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingConfig {
    /// Accessor interceptors that "all methods" never replaces
    #[serde(default = "default_magic_methods")]
    pub magic_methods: Vec<String>,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            magic_methods: default_magic_methods(),
        }
    }
}

fn default_magic_methods() -> Vec<String> {
    crate::filter::MAGIC_METHODS
        .iter()
        .map(|m| m.to_string())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Verify registered mocks when a scenario is dropped without teardown
    #[serde(default = "default_true")]
    pub verify_on_drop: bool,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            verify_on_drop: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Fallback level when `RUST_LOG` is unset (e.g. "info", "debug")
    #[serde(default)]
    pub level: Option<String>,
    /// Emit JSON lines instead of human readable output
    #[serde(default)]
    pub json: Option<bool>,
}

impl Config {
    /// Load configuration from a file in the project root
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration from `path`; a missing file yields the defaults
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            StubError::Config(format!(
                "Failed to read config file {:?}: {}",
                config_path, e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            StubError::Config(format!(
                "Failed to parse TOML config from {:?}: {}",
                config_path, e
            ))
        })?;

        Ok(config)
    }

    /// Load `.stubkit.toml`, falling back to the defaults when the file is
    /// missing, unreadable or malformed. Failures are logged, never returned.
    pub fn load_or_default() -> Self {
        Self::load_or_default_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// [`Config::load_or_default`] for an explicit path.
    pub fn load_or_default_from(config_path: &Path) -> Self {
        match Self::load_from(config_path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        }
    }
}
