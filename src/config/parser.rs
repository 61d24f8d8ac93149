use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use validator::Validate;

use super::models::NovaPayConfig;

/// Errors that can occur during configuration parsing
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to open config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Configuration validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Configuration error: {0}")]
    Other(String),
}

/// Provides default configuration file path
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".novapay")
        .join("config.yaml")
}

/// Parses and validates a configuration document
pub fn parse_config(content: &str) -> Result<NovaPayConfig, ConfigError> {
    // An empty document means "all defaults"
    let config: NovaPayConfig = if content.trim().is_empty() {
        NovaPayConfig::default()
    } else {
        serde_yaml::from_str(content)?
    };

    config.validate()?;

    // A lookup must finish before the next poll is due
    if config.network.request_timeout_secs >= config.poller.interval_secs {
        return Err(ConfigError::Other(format!(
            "network.request_timeout_secs ({}) must be shorter than poller.interval_secs ({})",
            config.network.request_timeout_secs, config.poller.interval_secs
        )));
    }

    Ok(config)
}

/// Loads and validates the NovaPay configuration
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<NovaPayConfig, ConfigError> {
    let mut file = File::open(&config_path).map_err(ConfigError::FileError)?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(ConfigError::FileError)?;

    parse_config(&content)
}

/// Loads an explicitly requested file, or the default file when it exists,
/// falling back to built-in defaults otherwise
pub fn load_or_default(explicit: Option<&Path>) -> Result<NovaPayConfig, ConfigError> {
    if let Some(path) = explicit {
        info!("Using configuration file: {:?}", path);
        return load_config(path);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        info!("Using configuration file: {:?}", default_path);
        load_config(&default_path)
    } else {
        info!("No configuration file found, using defaults");
        Ok(NovaPayConfig::default())
    }
}
