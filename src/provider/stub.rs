//! Stub backend for development and smoke tests.

use std::sync::Arc;

use crate::provider::error::ModelError;
use crate::provider::model::{GenerationLimits, ModelLoader, TranslationModel};
use crate::provider::pair::LanguagePair;

pub const STUB_PREFIX: &str = "[stub] ";

/// Returns the input unchanged behind a `[stub] ` marker.
#[derive(Debug, Default)]
pub struct StubModel;

impl TranslationModel for StubModel {
    fn generate(&self, text: &str, _limits: &GenerationLimits) -> Result<String, ModelError> {
        Ok(format!("{STUB_PREFIX}{text}"))
    }
}

#[derive(Debug, Default)]
pub struct StubLoader;

impl ModelLoader for StubLoader {
    fn load(
        &self,
        model_id: &str,
        pair: &LanguagePair,
    ) -> Result<Arc<dyn TranslationModel>, ModelError> {
        tracing::debug!(model_id, pair = %pair, "Stub model loaded");
        Ok(Arc::new(StubModel))
    }
}
