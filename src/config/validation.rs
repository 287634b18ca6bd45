//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, bind address parses)
//! - Detect duplicate or degenerate language pairs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{ServiceConfig, PLACEHOLDER_API_KEY};
use crate::provider::LanguagePair;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address `{0}`")]
    BindAddress(String),

    #[error("`{field}` must be greater than zero")]
    Zero { field: &'static str },

    #[error("no language pairs configured")]
    NoModels,

    #[error("model entry {index} has an empty {field}")]
    EmptyField { index: usize, field: &'static str },

    #[error("model entry {index} maps {pair} onto itself")]
    SameLanguage { index: usize, pair: String },

    #[error("language pair {0} is configured more than once")]
    DuplicatePair(String),

    #[error("`timeouts.request_secs` ({request_secs}) must exceed `limits.inference_timeout_secs` ({inference_secs})")]
    InferenceTimeout { request_secs: u64, inference_secs: u64 },

    #[error("admin is enabled but `admin.api_key` is unset or the placeholder")]
    AdminKey,
}

/// Validate a parsed configuration, collecting every error found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let limits = &config.limits;
    if limits.max_text_chars == 0 {
        errors.push(ValidationError::Zero { field: "limits.max_text_chars" });
    }
    if limits.max_input_tokens == 0 {
        errors.push(ValidationError::Zero { field: "limits.max_input_tokens" });
    }
    if limits.max_new_tokens == 0 {
        errors.push(ValidationError::Zero { field: "limits.max_new_tokens" });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.request_secs" });
    }
    let inference_secs = limits.inference_timeout_secs;
    if inference_secs > 0 && config.timeouts.request_secs <= inference_secs {
        errors.push(ValidationError::InferenceTimeout {
            request_secs: config.timeouts.request_secs,
            inference_secs,
        });
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero { field: "security.max_body_size" });
    }

    if config.models.is_empty() {
        errors.push(ValidationError::NoModels);
    }

    let mut seen = HashSet::new();
    for (index, model) in config.models.iter().enumerate() {
        let pair = LanguagePair::new(&model.source_lang, &model.target_lang);
        if pair.source_lang.is_empty() {
            errors.push(ValidationError::EmptyField { index, field: "source_lang" });
        }
        if pair.target_lang.is_empty() {
            errors.push(ValidationError::EmptyField { index, field: "target_lang" });
        }
        if model.model_id.trim().is_empty() {
            errors.push(ValidationError::EmptyField { index, field: "model_id" });
        }
        if !pair.source_lang.is_empty() && pair.source_lang == pair.target_lang {
            errors.push(ValidationError::SameLanguage { index, pair: pair.to_string() });
        }
        if !seen.insert(pair.clone()) {
            errors.push(ValidationError::DuplicatePair(pair.to_string()));
        }
    }

    if config.admin.enabled
        && (config.admin.api_key.is_empty() || config.admin.api_key == PLACEHOLDER_API_KEY)
    {
        errors.push(ValidationError::AdminKey);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
