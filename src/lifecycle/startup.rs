//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the model registry for the configured backend
//! - Preload models so `/ready` reflects load failures from the start
//! - Bind the listener
//!
//! # Design Decisions
//! - Config and logging errors are fatal; model load failures are not
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only once models are loaded)

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::provider::{build_loader, ModelRegistry, TranslationProvider};

/// Build the registry and, when configured, preload every model.
pub async fn build_registry(config: &ServiceConfig) -> Arc<ModelRegistry> {
    let registry = Arc::new(ModelRegistry::from_config(config, build_loader(config)));
    tracing::info!(
        backend = ?config.provider.backend,
        pairs = registry.supported_pairs().len(),
        "Model registry created"
    );

    if config.provider.preload {
        let preloading = registry.clone();
        match tokio::task::spawn_blocking(move || preloading.preload()).await {
            Ok(0) => tracing::info!("All models preloaded"),
            Ok(failed) => tracing::warn!(failed, "Some models failed to preload"),
            Err(err) => tracing::error!(error = %err, "Preload task failed"),
        }
    }

    registry
}

/// Bind the configured listener address.
pub async fn bind(config: &ServiceConfig) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");
    Ok(listener)
}
