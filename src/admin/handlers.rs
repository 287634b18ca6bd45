use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::provider::LanguagePair;

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub app_version: String,
    pub status: String,
    pub model_available: bool,
    pub unavailable_reason: Option<String>,
    pub supported_pairs: Vec<LanguagePair>,
    pub loaded_pairs: Vec<LanguagePair>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetSummary {
    /// Number of remembered load failures that were cleared.
    pub cleared: usize,
    pub model_available: bool,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let provider = &state.provider;
    let available = provider.is_available();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        app_version: state.config.observability.app_version.clone(),
        status: if available { "operational" } else { "degraded" }.to_string(),
        model_available: available,
        unavailable_reason: provider.unavailable_reason(),
        supported_pairs: provider.supported_pairs(),
        loaded_pairs: provider.loaded_pairs(),
    })
}

pub async fn reset_models(State(state): State<AppState>) -> Json<ResetSummary> {
    let cleared = state.provider.reset();
    let available = state.provider.is_available();
    metrics::set_model_available(available);
    tracing::info!(cleared, "Model failures reset via admin API");
    Json(ResetSummary {
        cleared,
        model_available: available,
    })
}
