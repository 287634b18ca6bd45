//! Request and response bodies for the translate API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::LimitsConfig;
use crate::provider::LanguagePair;

fn default_source_lang() -> String {
    "en".to_string()
}

/// Body of `POST /translate`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TranslationRequest {
    pub text: String,

    #[serde(default = "default_source_lang")]
    pub source_lang: String,

    pub target_lang: String,

    /// Opaque caller-supplied id, logged alongside the server request id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Schema-level request violation (HTTP 422).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestValidationError {
    #[error("text must not be empty")]
    EmptyText,

    #[error("text must be at most {max} characters, got {actual}")]
    TextTooLong { max: usize, actual: usize },
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, source_lang: &str, target_lang: &str) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            request_id: None,
        }
    }

    /// Check the text against `limits`, trimming it first when configured.
    ///
    /// Length is counted in characters, not bytes.
    pub fn validate(mut self, limits: &LimitsConfig) -> Result<Self, RequestValidationError> {
        if limits.trim_text {
            let trimmed = self.text.trim();
            if trimmed.len() != self.text.len() {
                self.text = trimmed.to_string();
            }
        }

        let chars = self.text.chars().count();
        if chars == 0 {
            return Err(RequestValidationError::EmptyText);
        }
        if chars > limits.max_text_chars {
            return Err(RequestValidationError::TextTooLong {
                max: limits.max_text_chars,
                actual: chars,
            });
        }
        Ok(self)
    }
}

/// Body of a successful `POST /translate`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TranslationResponse {
    pub translation: String,
    pub model: String,
    pub source_lang: String,
    pub target_lang: String,
    pub latency_ms: u64,
}

/// Body of `GET /supported-languages`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SupportedLanguages {
    pub pairs: Vec<LanguagePair>,
}

/// Body of `GET /health` and a ready `GET /ready`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatusBody {
    pub status: String,
}

impl StatusBody {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
