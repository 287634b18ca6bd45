//! Provider and model error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// User-facing message for a model that could not be loaded.
pub const UNAVAILABLE_MESSAGE: &str =
    "Translation model is unavailable. Download the model and try again.";

/// Errors raised while loading or running a model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Model files are not present on disk.
    #[error("model `{model_id}` not found at {}", .path.display())]
    NotFound { model_id: String, path: PathBuf },

    /// Model files exist but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Model files are present but unusable.
    #[error("malformed model file {} at line {line}: {reason}", .path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Generation failed after a successful load.
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Errors surfaced by a translation provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The pair is not in the registry. Carries the formatted supported list.
    #[error("Supported language pairs: {supported}")]
    UnsupportedLanguagePair { supported: String },

    /// The model backing the pair failed to initialize.
    #[error("Translation model is unavailable. Download the model and try again.")]
    Unavailable { reason: String },

    /// The model was loaded but failed while translating.
    #[error("translation failed: {0}")]
    Inference(#[source] ModelError),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProviderError::UnsupportedLanguagePair {
            supported: "en->es, en->fr".into(),
        };
        assert_eq!(err.to_string(), "Supported language pairs: en->es, en->fr");

        let err = ProviderError::Unavailable {
            reason: "disk on fire".into(),
        };
        assert_eq!(err.to_string(), UNAVAILABLE_MESSAGE);

        let err = ModelError::NotFound {
            model_id: "m".into(),
            path: PathBuf::from("/models/m/lexicon.tsv"),
        };
        assert_eq!(err.to_string(), "model `m` not found at /models/m/lexicon.tsv");
    }
}
