//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: `{value}`")]
    Env { var: &'static str, value: String },

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

/// Load configuration from an optional TOML file, apply environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto a parsed configuration.
///
/// `lookup` abstracts the environment so callers can supply their own source.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(version) = lookup("APP_VERSION") {
        config.observability.app_version = version;
    }
    if let Some(addr) = lookup("TRANSLATOR_BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
    if let Some(dir) = lookup("MODEL_DIR") {
        config.provider.model_dir = dir;
    }
    if let Some(value) = lookup("MAX_TEXT_LENGTH") {
        config.limits.max_text_chars = parse_usize("MAX_TEXT_LENGTH", value)?;
    }
    if let Some(value) = lookup("MAX_INPUT_TOKENS") {
        config.limits.max_input_tokens = parse_usize("MAX_INPUT_TOKENS", value)?;
    }
    if let Some(value) = lookup("MAX_NEW_TOKENS") {
        config.limits.max_new_tokens = parse_usize("MAX_NEW_TOKENS", value)?;
    }
    Ok(())
}

fn parse_usize(var: &'static str, value: String) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { var, value })
}
