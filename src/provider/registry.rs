//! Model registry: pair → model id mapping plus the lazy model cache.
//!
//! # Responsibilities
//! - Resolve language pairs to model ids (immutable after construction)
//! - Load each pair's model at most once, on first use or at preload
//! - Remember load failures until an operator resets them
//!
//! # Design Decisions
//! - Loaded models sit in per-pair `OnceLock` slots: the hot path never locks
//! - One registry-wide mutex serializes initialization (check, lock, recheck)
//! - A failed pair is not retried on every request; it stays failed and
//!   `/ready` reports it until `reset()` clears the failure
//! - Entries are never evicted

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use dashmap::DashMap;

use crate::config::ServiceConfig;
use crate::observability::metrics;
use crate::provider::error::{ProviderError, ProviderResult};
use crate::provider::model::{GenerationLimits, ModelLoader, TranslationModel};
use crate::provider::pair::{format_pairs, LanguagePair};
use crate::provider::{Translation, TranslationProvider};

struct ModelSlot {
    model_id: String,
    model: OnceLock<Arc<dyn TranslationModel>>,
}

/// Registry of supported pairs and their lazily loaded models.
pub struct ModelRegistry {
    slots: BTreeMap<LanguagePair, ModelSlot>,
    loader: Box<dyn ModelLoader>,
    limits: GenerationLimits,
    init_lock: Mutex<()>,
    failures: DashMap<LanguagePair, String>,
    last_failure: Mutex<Option<String>>,
}

impl ModelRegistry {
    /// Create a registry from `(pair, model_id)` entries.
    pub fn new<I>(models: I, loader: Box<dyn ModelLoader>, limits: GenerationLimits) -> Self
    where
        I: IntoIterator<Item = (LanguagePair, String)>,
    {
        let slots = models
            .into_iter()
            .map(|(pair, model_id)| {
                let slot = ModelSlot {
                    model_id,
                    model: OnceLock::new(),
                };
                (pair, slot)
            })
            .collect();

        Self {
            slots,
            loader,
            limits,
            init_lock: Mutex::new(()),
            failures: DashMap::new(),
            last_failure: Mutex::new(None),
        }
    }

    /// Create a registry from the `models` and `limits` sections of the config.
    pub fn from_config(config: &ServiceConfig, loader: Box<dyn ModelLoader>) -> Self {
        let models = config.models.iter().map(|m| {
            (
                LanguagePair::new(&m.source_lang, &m.target_lang),
                m.model_id.trim().to_string(),
            )
        });
        Self::new(models, loader, GenerationLimits::from(&config.limits))
    }

    /// Load every registered model. Failures are logged and remembered;
    /// returns the number of pairs that failed.
    pub fn preload(&self) -> usize {
        let mut failed = 0;
        for (pair, slot) in &self.slots {
            if let Err(err) = self.get_or_init(pair, slot) {
                failed += 1;
                tracing::warn!(pair = %pair, model_id = %slot.model_id, error = %err, "Preload failed");
            }
        }
        metrics::set_model_available(self.is_available());
        failed
    }

    fn cached_failure(&self, pair: &LanguagePair) -> Option<ProviderError> {
        self.failures
            .get(pair)
            .map(|reason| ProviderError::Unavailable {
                reason: reason.value().clone(),
            })
    }

    /// Return the pair's model, loading it on first use.
    fn get_or_init(
        &self,
        pair: &LanguagePair,
        slot: &ModelSlot,
    ) -> ProviderResult<Arc<dyn TranslationModel>> {
        if let Some(model) = slot.model.get() {
            return Ok(model.clone());
        }
        // Known failures never wait on another pair's load.
        if let Some(err) = self.cached_failure(pair) {
            return Err(err);
        }

        let _guard = self.init_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(model) = slot.model.get() {
            return Ok(model.clone());
        }
        if let Some(err) = self.cached_failure(pair) {
            return Err(err);
        }

        tracing::info!(pair = %pair, model_id = %slot.model_id, "Loading model");
        match self.loader.load(&slot.model_id, pair) {
            Ok(model) => {
                let model = slot.model.get_or_init(|| model).clone();
                metrics::set_model_available(self.is_available());
                Ok(model)
            }
            Err(err) => {
                let reason = err.to_string();
                tracing::error!(pair = %pair, model_id = %slot.model_id, error = %reason, "Model load failed");
                self.failures.insert(pair.clone(), reason.clone());
                *self.last_failure.lock().unwrap_or_else(PoisonError::into_inner) =
                    Some(reason.clone());
                metrics::set_model_available(false);
                Err(ProviderError::Unavailable { reason })
            }
        }
    }
}

impl TranslationProvider for ModelRegistry {
    fn resolve_model(&self, pair: &LanguagePair) -> Option<String> {
        self.slots.get(pair).map(|slot| slot.model_id.clone())
    }

    fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> ProviderResult<Translation> {
        let pair = LanguagePair::new(source_lang, target_lang);
        let Some(slot) = self.slots.get(&pair) else {
            return Err(ProviderError::UnsupportedLanguagePair {
                supported: format_pairs(self.slots.keys()),
            });
        };

        let model = self.get_or_init(&pair, slot)?;
        let text = model
            .generate(text, &self.limits)
            .map_err(ProviderError::Inference)?;

        Ok(Translation {
            text,
            model_id: slot.model_id.clone(),
        })
    }

    fn is_available(&self) -> bool {
        self.failures.is_empty()
    }

    fn unavailable_reason(&self) -> Option<String> {
        if self.is_available() {
            return None;
        }
        self.last_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn supported_pairs(&self) -> Vec<LanguagePair> {
        self.slots.keys().cloned().collect()
    }

    fn loaded_pairs(&self) -> Vec<LanguagePair> {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.model.get().is_some())
            .map(|(pair, _)| pair.clone())
            .collect()
    }

    fn reset(&self) -> usize {
        let _guard = self.init_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let cleared = self.failures.len();
        self.failures.clear();
        *self.last_failure.lock().unwrap_or_else(PoisonError::into_inner) = None;
        metrics::set_model_available(true);
        tracing::info!(cleared, "Model load failures reset");
        cleared
    }
}
