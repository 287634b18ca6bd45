//! Model and loader abstractions.
//!
//! The inference engine is opaque to the rest of the service: a
//! [`ModelLoader`] turns a model id into a [`TranslationModel`], and the
//! registry only ever talks to those two traits.

use std::sync::Arc;

use crate::config::LimitsConfig;
use crate::provider::error::ModelError;
use crate::provider::pair::LanguagePair;

/// Token limits applied during generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationLimits {
    /// Input is truncated to this many tokens.
    pub max_input_tokens: usize,
    /// Output is capped at this many tokens.
    pub max_new_tokens: usize,
}

impl From<&LimitsConfig> for GenerationLimits {
    fn from(config: &LimitsConfig) -> Self {
        Self {
            max_input_tokens: config.max_input_tokens,
            max_new_tokens: config.max_new_tokens,
        }
    }
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self::from(&LimitsConfig::default())
    }
}

/// A loaded, ready-to-run translation model.
pub trait TranslationModel: Send + Sync {
    fn generate(&self, text: &str, limits: &GenerationLimits) -> Result<String, ModelError>;
}

/// Loads models by id. Loading may be slow and is called at most once per
/// pair by the registry.
pub trait ModelLoader: Send + Sync {
    fn load(&self, model_id: &str, pair: &LanguagePair)
        -> Result<Arc<dyn TranslationModel>, ModelError>;
}
