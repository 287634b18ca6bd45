//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeouts, body limit, request ID, metrics)
//! - Leave `/translate` to the pipeline's inference deadline
//! - Mount the admin API when enabled
//! - Bind server to listener and stop on the shutdown signal
//! - Keep the Prometheus recorder's histograms drained

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin::setup_admin_router;
use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::middleware::track_metrics;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::pipeline::TranslatePipeline;
use crate::provider::TranslationProvider;

const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: TranslatePipeline,
    pub provider: Arc<dyn TranslationProvider>,
    pub config: Arc<ServiceConfig>,
    pub metrics: PrometheusHandle,
}

/// HTTP server for the translation API.
pub struct HttpServer {
    router: Router,
    config: Arc<ServiceConfig>,
    metrics: PrometheusHandle,
}

impl HttpServer {
    /// Create a new HTTP server over `provider`.
    pub fn new(
        config: ServiceConfig,
        provider: Arc<dyn TranslationProvider>,
        metrics: PrometheusHandle,
    ) -> Self {
        let config = Arc::new(config);
        let state = AppState {
            pipeline: TranslatePipeline::from_config(provider.clone(), &config),
            provider,
            config: config.clone(),
            metrics: metrics.clone(),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            metrics,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// `/translate` is not under the request timeout; the pipeline's
    /// inference timeout bounds it instead.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let mut bounded = Router::new()
            .route("/health", get(handlers::health))
            .route("/ready", get(handlers::ready))
            .route("/supported-languages", get(handlers::supported_languages))
            .route("/metrics", get(handlers::render_metrics));

        if config.admin.enabled {
            bounded = bounded.merge(setup_admin_router(state.clone()));
        }

        bounded
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .route("/translate", post(handlers::translate))
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(propagate_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(RequestBodyLimitLayer::new(config.security.max_body_size)),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            admin_enabled = self.config.admin.enabled,
            "HTTP server starting"
        );

        let upkeep = spawn_upkeep(self.metrics.clone());

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        upkeep.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn spawn_upkeep(handle: PrometheusHandle) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(UPKEEP_INTERVAL);
        loop {
            interval.tick().await;
            handle.run_upkeep();
        }
    })
}
