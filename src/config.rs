//! Configuration management for LinkChain

use crate::error::ChainError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    #[serde(default = "default_chain_file")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_chain_file(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    pub fn max_level(&self) -> Result<tracing::Level, ChainError> {
        self.level
            .parse::<tracing::Level>()
            .map_err(|_| ChainError::Config(format!("unknown logging.level '{}'", self.level)))
    }
}

fn default_chain_file() -> String {
    "blockchain.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load `config.toml` from the working directory.
pub fn load_config() -> Result<Config, ChainError> {
    load_config_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Load configuration from `path`, falling back to defaults when the file is absent.
pub fn load_config_from(path: &Path) -> Result<Config, ChainError> {
    let config: Config = if path.exists() {
        let config_str = fs::read_to_string(path)
            .map_err(|e| ChainError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&config_str)
            .map_err(|e| ChainError::Config(format!("failed to parse {}: {}", path.display(), e)))?
    } else {
        Config::default()
    };

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ChainError> {
    if config.storage.path.trim().is_empty() {
        return Err(ChainError::Config(
            "storage.path must not be empty".to_string(),
        ));
    }
    config.logging.max_level()?;
    Ok(())
}
