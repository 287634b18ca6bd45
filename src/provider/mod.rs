//! Translation provider subsystem.
//!
//! # Data Flow
//! ```text
//! translate(text, source, target)
//!     → pair.rs (normalize into LanguagePair)
//!     → registry.rs (pair → model id, unsupported pairs rejected)
//!     → registry.rs (lazy load via ModelLoader, at most once per pair)
//!     → model.rs (TranslationModel::generate with token limits)
//!     → Translation { text, model_id }
//! ```
//!
//! # Design Decisions
//! - The pipeline depends on the `TranslationProvider` trait, never on a
//!   concrete backend, so tests can substitute their own provider
//! - Unsupported pairs (client error) and load failures (infrastructure
//!   error) are distinct variants of `ProviderError`
//! - Backends (`stub`, `lexicon`) are selected from config at startup

pub mod error;
pub mod lexicon;
pub mod model;
pub mod pair;
pub mod registry;
pub mod stub;

pub use error::{ModelError, ProviderError, ProviderResult, UNAVAILABLE_MESSAGE};
pub use model::{GenerationLimits, ModelLoader, TranslationModel};
pub use pair::{normalize_lang, LanguagePair};
pub use registry::ModelRegistry;

use crate::config::{BackendKind, ServiceConfig};
use lexicon::LexiconLoader;
use stub::StubLoader;

/// Result of a successful translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    /// Id of the model that produced `text`.
    pub model_id: String,
}

/// Capability surface the request pipeline depends on.
///
/// Implementations must be safe to call concurrently; `translate` may block
/// while a model is loaded.
pub trait TranslationProvider: Send + Sync {
    /// Trim and lower-case a language code.
    fn normalize(&self, lang: &str) -> String {
        normalize_lang(lang)
    }

    /// Model id registered for `pair`, without loading anything.
    fn resolve_model(&self, pair: &LanguagePair) -> Option<String>;

    fn translate(&self, text: &str, source_lang: &str, target_lang: &str)
        -> ProviderResult<Translation>;

    /// False while any model load failure is remembered.
    fn is_available(&self) -> bool;

    fn unavailable_reason(&self) -> Option<String>;

    /// Every registered pair, sorted.
    fn supported_pairs(&self) -> Vec<LanguagePair>;

    /// Pairs whose model is currently loaded.
    fn loaded_pairs(&self) -> Vec<LanguagePair>;

    /// Forget remembered load failures so the next request retries the load.
    /// Returns how many failures were cleared.
    fn reset(&self) -> usize;
}

/// Build the model loader selected by `provider.backend`.
pub fn build_loader(config: &ServiceConfig) -> Box<dyn ModelLoader> {
    match config.provider.backend {
        BackendKind::Stub => Box::new(StubLoader),
        BackendKind::Lexicon => Box::new(LexiconLoader::new(&config.provider.model_dir)),
    }
}
