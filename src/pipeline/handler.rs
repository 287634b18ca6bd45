//! The translate request pipeline.
//!
//! # Responsibilities
//! - Open the log span and keep it balanced (one start, one terminal event)
//! - Reject identical source and target before touching the provider
//! - Run inference on the blocking pool, bounded by the inference timeout
//! - Map provider failures onto [`TranslateError`] and record metrics

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;

use crate::config::ServiceConfig;
use crate::observability::metrics;
use crate::observability::{stable_text_hash, BaseFields, TranslateLogSpan};
use crate::pipeline::error::{TranslateError, SAME_LANGUAGE_MESSAGE};
use crate::pipeline::types::{TranslationRequest, TranslationResponse};
use crate::provider::{LanguagePair, Translation, TranslationProvider};

/// Endpoint label used for translate error metrics.
pub const TRANSLATE_ENDPOINT: &str = "/translate";

const UNKNOWN_MODEL: &str = "unknown";

/// Orchestrates a single `POST /translate`.
#[derive(Clone)]
pub struct TranslatePipeline {
    provider: Arc<dyn TranslationProvider>,
    app_version: String,
    inference_timeout: Option<Duration>,
}

impl TranslatePipeline {
    pub fn new(provider: Arc<dyn TranslationProvider>, app_version: impl Into<String>) -> Self {
        Self {
            provider,
            app_version: app_version.into(),
            inference_timeout: None,
        }
    }

    /// Bound each inference call. `None` waits indefinitely.
    pub fn with_inference_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.inference_timeout = timeout;
        self
    }

    pub fn from_config(provider: Arc<dyn TranslationProvider>, config: &ServiceConfig) -> Self {
        let timeout = match config.limits.inference_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self::new(provider, config.observability.app_version.clone())
            .with_inference_timeout(timeout)
    }

    /// The request's language pair, normalized by the provider.
    fn pair_for(&self, request: &TranslationRequest) -> LanguagePair {
        LanguagePair {
            source_lang: self.provider.normalize(&request.source_lang),
            target_lang: self.provider.normalize(&request.target_lang),
        }
    }

    fn base_fields(
        &self,
        request: &TranslationRequest,
        pair: &LanguagePair,
        request_id: &str,
    ) -> BaseFields {
        let model_id = self
            .provider
            .resolve_model(pair)
            .unwrap_or_else(|| UNKNOWN_MODEL.to_string());

        BaseFields {
            request_id: request_id.to_string(),
            client_request_id: request.request_id.clone(),
            source_lang: pair.source_lang.clone(),
            target_lang: pair.target_lang.clone(),
            model_id,
            text_length: request.text.chars().count(),
            text_hash: stable_text_hash(&request.text),
            app_version: self.app_version.clone(),
        }
    }

    /// Translate a validated request.
    ///
    /// Emits exactly one start and one terminal span event and bumps exactly
    /// one outcome counter, whatever the outcome.
    pub async fn handle_translate(
        &self,
        request: TranslationRequest,
        request_id: &str,
    ) -> Result<TranslationResponse, TranslateError> {
        let pair = self.pair_for(&request);
        let span = TranslateLogSpan::new(self.base_fields(&request, &pair, request_id)).start();

        match self.run(&request.text, pair).await {
            Ok(translation) => {
                let latency_ms = span.success(StatusCode::OK.as_u16());
                metrics::record_translation(&translation.model_id);
                Ok(TranslationResponse {
                    translation: translation.text,
                    model: translation.model_id,
                    source_lang: request.source_lang,
                    target_lang: request.target_lang,
                    latency_ms,
                })
            }
            Err(err) => {
                let category = err.category();
                metrics::record_error(TRANSLATE_ENDPOINT, category);
                span.failure(err.status().as_u16(), category, err.cause());
                Err(err)
            }
        }
    }

    async fn run(&self, text: &str, pair: LanguagePair) -> Result<Translation, TranslateError> {
        if pair.is_identity() {
            return Err(TranslateError::BadRequest(SAME_LANGUAGE_MESSAGE.to_string()));
        }

        let provider = self.provider.clone();
        let text = text.to_string();
        let task = tokio::task::spawn_blocking(move || {
            provider.translate(&text, &pair.source_lang, &pair.target_lang)
        });

        let joined = match self.inference_timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    return Err(TranslateError::internal(format!(
                        "inference timed out after {}s",
                        limit.as_secs()
                    )))
                }
            },
            None => task.await,
        };

        match joined {
            Ok(result) => result.map_err(TranslateError::from),
            Err(join_err) => Err(TranslateError::internal(format!(
                "inference worker failed: {join_err}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::error::{ErrorCategory, INTERNAL_MESSAGE};
    use crate::provider::{ModelError, ProviderError, ProviderResult, UNAVAILABLE_MESSAGE};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tracing::field::{Field, Visit};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    #[derive(Clone, Copy)]
    enum Behavior {
        Echo,
        Unavailable,
        Inference,
        Panic,
        Slow,
    }

    struct FakeProvider {
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl TranslationProvider for FakeProvider {
        fn resolve_model(&self, pair: &LanguagePair) -> Option<String> {
            (pair == &LanguagePair::new("en", "fr")).then(|| "fake-en-fr".to_string())
        }

        fn translate(&self, text: &str, source: &str, target: &str) -> ProviderResult<Translation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.resolve_model(&LanguagePair::new(source, target)).is_none() {
                return Err(ProviderError::UnsupportedLanguagePair {
                    supported: "en->fr".into(),
                });
            }
            match self.behavior {
                Behavior::Echo => Ok(Translation {
                    text: text.to_uppercase(),
                    model_id: "fake-en-fr".into(),
                }),
                Behavior::Unavailable => Err(ProviderError::Unavailable {
                    reason: "weights missing".into(),
                }),
                Behavior::Inference => Err(ProviderError::Inference(ModelError::Inference(
                    "secret stack detail".into(),
                ))),
                Behavior::Panic => panic!("model exploded"),
                Behavior::Slow => {
                    std::thread::sleep(Duration::from_millis(300));
                    Ok(Translation {
                        text: text.into(),
                        model_id: "fake-en-fr".into(),
                    })
                }
            }
        }

        fn is_available(&self) -> bool {
            true
        }

        fn unavailable_reason(&self) -> Option<String> {
            None
        }

        fn supported_pairs(&self) -> Vec<LanguagePair> {
            vec![LanguagePair::new("en", "fr")]
        }

        fn loaded_pairs(&self) -> Vec<LanguagePair> {
            Vec::new()
        }

        fn reset(&self) -> usize {
            0
        }
    }

    type Events = Arc<Mutex<Vec<HashMap<String, String>>>>;

    /// Collects the fields of every translate span event.
    struct Capture(Events);

    struct FieldVisitor<'a>(&'a mut HashMap<String, String>);

    impl Visit for FieldVisitor<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_string(), value.to_string());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            self.0.insert(field.name().to_string(), format!("{value:?}"));
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for Capture {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if event.metadata().target() != crate::observability::span::TRANSLATE_TARGET {
                return;
            }
            let mut fields = HashMap::new();
            fields.insert("level".to_string(), event.metadata().level().to_string());
            event.record(&mut FieldVisitor(&mut fields));
            if let Ok(mut events) = self.0.lock() {
                events.push(fields);
            }
        }
    }

    async fn run_captured(
        pipeline: &TranslatePipeline,
        request: TranslationRequest,
    ) -> (Result<TranslationResponse, TranslateError>, Vec<HashMap<String, String>>) {
        let events: Events = Arc::default();
        let subscriber = tracing_subscriber::registry().with(Capture(events.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);
        let result = pipeline.handle_translate(request, "req-1").await;
        let events = events.lock().unwrap().clone();
        (result, events)
    }

    fn event_names(events: &[HashMap<String, String>]) -> Vec<&str> {
        events.iter().map(|e| e["event"].as_str()).collect()
    }

    #[tokio::test]
    async fn test_success_emits_start_and_success() {
        let provider = FakeProvider::new(Behavior::Echo);
        let pipeline = TranslatePipeline::new(provider.clone(), "1.2.3");
        let (result, events) =
            run_captured(&pipeline, TranslationRequest::new("hello", "EN", "fr")).await;

        let response = result.unwrap();
        assert_eq!(response.translation, "HELLO");
        assert_eq!(response.model, "fake-en-fr");
        assert_eq!(response.source_lang, "EN");
        assert_eq!(response.target_lang, "fr");

        assert_eq!(event_names(&events), vec!["translate_start", "translate_success"]);
        let start = &events[0];
        assert_eq!(start["request_id"], "req-1");
        assert_eq!(start["source_lang"], "en");
        assert_eq!(start["model_id"], "fake-en-fr");
        assert_eq!(start["text_length"], "5");
        assert_eq!(start["text_hash"], stable_text_hash("hello"));
        assert_eq!(start["app_version"], "1.2.3");
        assert_eq!(start["status_code"], "0");
        assert!(!start.values().any(|v| v == "hello"));
        assert_eq!(events[1]["status_code"], "200");
        assert_eq!(events[1]["latency_ms"], response.latency_ms.to_string());
    }

    #[tokio::test]
    async fn test_same_language_skips_provider() {
        let provider = FakeProvider::new(Behavior::Echo);
        let pipeline = TranslatePipeline::new(provider.clone(), "test");
        let (result, events) =
            run_captured(&pipeline, TranslationRequest::new("hello", "en", " EN ")).await;

        let err = result.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::BadRequest);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.detail(), SAME_LANGUAGE_MESSAGE);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);

        assert_eq!(event_names(&events), vec!["translate_start", "translate_failure"]);
        assert_eq!(events[0]["model_id"], "unknown");
        assert_eq!(events[1]["level"], "INFO");
        assert_eq!(events[1]["error_category"], "bad_request");
        assert_eq!(events[1]["status_code"], "400");
    }

    #[tokio::test]
    async fn test_unsupported_pair_is_bad_request() {
        let pipeline = TranslatePipeline::new(FakeProvider::new(Behavior::Echo), "test");
        let (result, events) =
            run_captured(&pipeline, TranslationRequest::new("hello", "en", "de")).await;

        let err = result.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.detail(), "Supported language pairs: en->fr");
        assert_eq!(event_names(&events), vec!["translate_start", "translate_failure"]);
    }

    #[tokio::test]
    async fn test_unavailable_is_internal_error() {
        let pipeline = TranslatePipeline::new(FakeProvider::new(Behavior::Unavailable), "test");
        let (result, events) =
            run_captured(&pipeline, TranslationRequest::new("hello", "en", "fr")).await;

        let err = result.unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail(), UNAVAILABLE_MESSAGE);
        assert_eq!(events[1]["level"], "ERROR");
        assert_eq!(events[1]["error_category"], "internal_error");
        assert_eq!(events[1]["error"], "weights missing");
    }

    #[tokio::test]
    async fn test_inference_error_hides_cause() {
        let pipeline = TranslatePipeline::new(FakeProvider::new(Behavior::Inference), "test");
        let (result, events) =
            run_captured(&pipeline, TranslationRequest::new("hello", "en", "fr")).await;

        let err = result.unwrap_err();
        assert_eq!(err.detail(), INTERNAL_MESSAGE);
        assert!(events[1]["error"].contains("secret stack detail"));
    }

    #[tokio::test]
    async fn test_worker_panic_is_internal_error() {
        let pipeline = TranslatePipeline::new(FakeProvider::new(Behavior::Panic), "test");
        let (result, events) =
            run_captured(&pipeline, TranslationRequest::new("hello", "en", "fr")).await;

        let err = result.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InternalError);
        assert_eq!(err.detail(), INTERNAL_MESSAGE);
        assert_eq!(event_names(&events), vec!["translate_start", "translate_failure"]);
    }

    #[tokio::test]
    async fn test_inference_timeout() {
        let pipeline = TranslatePipeline::new(FakeProvider::new(Behavior::Slow), "test")
            .with_inference_timeout(Some(Duration::from_millis(50)));
        let (result, events) =
            run_captured(&pipeline, TranslationRequest::new("hello", "en", "fr")).await;

        let err = result.unwrap_err();
        assert_eq!(err.detail(), INTERNAL_MESSAGE);
        assert!(err.cause().unwrap().contains("timed out"));
        assert_eq!(event_names(&events), vec!["translate_start", "translate_failure"]);
    }

    #[tokio::test]
    async fn test_client_request_id_is_logged() {
        let pipeline = TranslatePipeline::new(FakeProvider::new(Behavior::Echo), "test");
        let mut request = TranslationRequest::new("hello", "en", "fr");
        request.request_id = Some("client-42".into());
        let (_, events) = run_captured(&pipeline, request).await;

        assert_eq!(events[0]["request_id"], "req-1");
        assert_eq!(events[0]["client_request_id"], "client-42");
    }
}
