//! Configuration loading from disk.
//!
//! A config file holds one table per profile, so a single file can carry
//! `default`, `test`, `production` and so on side by side.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate one profile from a TOML file.
pub fn load_config(path: &Path, profile: &str) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content, profile)
}

/// Parse and validate one profile from TOML text.
pub fn parse_config(content: &str, profile: &str) -> Result<GatewayConfig, ConfigError> {
    let mut profiles: HashMap<String, GatewayConfig> = toml::from_str(content)?;
    let config = profiles
        .remove(profile)
        .ok_or_else(|| ConfigError::ProfileNotFound(profile.to_string()))?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
