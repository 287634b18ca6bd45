//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the translation service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Input and generation limits.
    pub limits: LimitsConfig,

    /// Language pairs served and the model backing each one.
    pub models: Vec<ModelConfig>,

    /// Model backend settings.
    pub provider: ProviderConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            limits: LimitsConfig::default(),
            models: default_models(),
            provider: ProviderConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            admin: AdminConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Limits applied to translation requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum length of `text`, in characters.
    pub max_text_chars: usize,

    /// Trim surrounding whitespace from `text` before validating it.
    pub trim_text: bool,

    /// Input is truncated to this many tokens before generation.
    pub max_input_tokens: usize,

    /// Upper bound on generated tokens.
    pub max_new_tokens: usize,

    /// Inference deadline in seconds (0 disables).
    pub inference_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_text_chars: 2000,
            trim_text: false,
            max_input_tokens: 512,
            max_new_tokens: 256,
            inference_timeout_secs: 60,
        }
    }
}

/// A registered language pair and the model serving it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModelConfig {
    pub source_lang: String,
    pub target_lang: String,
    /// Model identifier, also used as the model's directory under `model_dir`.
    pub model_id: String,
}

impl ModelConfig {
    pub fn new(source_lang: &str, target_lang: &str, model_id: &str) -> Self {
        Self {
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            model_id: model_id.to_string(),
        }
    }
}

fn default_models() -> Vec<ModelConfig> {
    vec![
        ModelConfig::new("en", "fr", "Helsinki-NLP/opus-mt-en-fr"),
        ModelConfig::new("en", "es", "Helsinki-NLP/opus-mt-en-es"),
    ]
}

/// Which model backend serves translations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Echoes the input with a `[stub] ` prefix. Needs no model files.
    Stub,
    /// Word lexicon read from `<model_dir>/<model_id>/lexicon.tsv`.
    Lexicon,
}

/// Model backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub backend: BackendKind,

    /// Root directory holding one sub-directory per model id.
    pub model_dir: String,

    /// Load every registered model at startup instead of on first use.
    pub preload: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Stub,
            model_dir: "models".to_string(),
            preload: true,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 120 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Version string attached to every translate log event.
    pub app_version: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            app_version: "unknown".to_string(),
        }
    }
}

/// Placeholder admin key; refused by validation when admin is enabled.
pub const PLACEHOLDER_API_KEY: &str = "CHANGE_ME_IN_PRODUCTION";

/// Admin endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Mount the `/admin` routes.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: PLACEHOLDER_API_KEY.to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}
