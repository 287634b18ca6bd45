//! Public endpoint handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::http::request::RequestId;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::pipeline::{StatusBody, SupportedLanguages, TranslationRequest, TranslationResponse};

const NOT_READY_PREFIX: &str = "Translation model is unavailable.";

pub async fn health() -> Json<StatusBody> {
    Json(StatusBody::ok())
}

/// Readiness reflects remembered model load failures.
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusBody>, ApiError> {
    let available = state.provider.is_available();
    metrics::set_model_available(available);
    if available {
        return Ok(Json(StatusBody::ok()));
    }

    let detail = match state.provider.unavailable_reason() {
        Some(reason) => format!("{NOT_READY_PREFIX} {reason}"),
        None => NOT_READY_PREFIX.to_string(),
    };
    Err(ApiError::NotReady(detail))
}

pub async fn supported_languages(State(state): State<AppState>) -> Json<SupportedLanguages> {
    Json(SupportedLanguages {
        pairs: state.provider.supported_pairs(),
    })
}

pub async fn render_metrics(State(state): State<AppState>) -> String {
    state.metrics.render()
}

pub async fn translate(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> Result<Json<TranslationResponse>, ApiError> {
    let Json(request) = payload?;
    let request = request.validate(&state.config.limits)?;
    let response = state
        .pipeline
        .handle_translate(request, request_id.as_str())
        .await?;
    Ok(Json(response))
}
