//! Translate error taxonomy and its HTTP mapping.

use std::fmt;

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::provider::ProviderError;

pub const SAME_LANGUAGE_MESSAGE: &str = "source_lang and target_lang must be different";
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Category tag attached to every failure for metrics and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    BadRequest,
    InternalError,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::BadRequest => "bad_request",
            ErrorCategory::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed translate request.
///
/// `Display` is the caller-visible message; internal detail is only
/// reachable through [`TranslateError::cause`].
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The caller must fix the input.
    #[error("{0}")]
    BadRequest(String),

    /// A model could not be loaded. Retryable after operator intervention.
    #[error("Translation model is unavailable. Download the model and try again.")]
    Unavailable { reason: String },

    /// Anything else. The cause is logged, never returned.
    #[error("Internal server error")]
    Internal { cause: String },
}

impl TranslateError {
    pub fn internal(cause: impl Into<String>) -> Self {
        TranslateError::Internal {
            cause: cause.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslateError::BadRequest(_) => ErrorCategory::BadRequest,
            TranslateError::Unavailable { .. } | TranslateError::Internal { .. } => {
                ErrorCategory::InternalError
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.category() {
            ErrorCategory::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCategory::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the caller.
    pub fn detail(&self) -> String {
        self.to_string()
    }

    /// Internal detail for logs.
    pub fn cause(&self) -> Option<&str> {
        match self {
            TranslateError::BadRequest(_) => None,
            TranslateError::Unavailable { reason } => Some(reason),
            TranslateError::Internal { cause } => Some(cause),
        }
    }
}

impl From<ProviderError> for TranslateError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::UnsupportedLanguagePair { .. } => {
                TranslateError::BadRequest(err.to_string())
            }
            ProviderError::Unavailable { reason } => TranslateError::Unavailable { reason },
            ProviderError::Inference(source) => TranslateError::internal(source.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ModelError, UNAVAILABLE_MESSAGE};

    #[test]
    fn test_mapping_table() {
        let cases = [
            (
                TranslateError::BadRequest(SAME_LANGUAGE_MESSAGE.into()),
                ErrorCategory::BadRequest,
                StatusCode::BAD_REQUEST,
            ),
            (
                TranslateError::Unavailable { reason: "missing".into() },
                ErrorCategory::InternalError,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                TranslateError::internal("boom"),
                ErrorCategory::InternalError,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, category, status) in cases {
            assert_eq!(err.category(), category);
            assert_eq!(err.status(), status);
        }
    }

    #[test]
    fn test_internal_cause_not_in_detail() {
        let err = TranslateError::internal("tensor shape mismatch at layer 3");
        assert_eq!(err.detail(), INTERNAL_MESSAGE);
        assert_eq!(err.cause(), Some("tensor shape mismatch at layer 3"));
    }

    #[test]
    fn test_from_provider_error() {
        let err = TranslateError::from(ProviderError::UnsupportedLanguagePair {
            supported: "en->fr".into(),
        });
        assert_eq!(err.detail(), "Supported language pairs: en->fr");
        assert_eq!(err.category(), ErrorCategory::BadRequest);

        let err = TranslateError::from(ProviderError::Unavailable { reason: "gone".into() });
        assert_eq!(err.detail(), UNAVAILABLE_MESSAGE);
        assert_eq!(err.cause(), Some("gone"));

        let err = TranslateError::from(ProviderError::Inference(ModelError::Inference("nan".into())));
        assert_eq!(err.detail(), INTERNAL_MESSAGE);
        assert_eq!(err.cause(), Some("inference failed: nan"));
    }

    #[test]
    fn test_category_strings() {
        assert_eq!(ErrorCategory::BadRequest.to_string(), "bad_request");
        assert_eq!(ErrorCategory::InternalError.as_str(), "internal_error");
    }
}
