use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use translator_service::config::load_config;
use translator_service::http::HttpServer;
use translator_service::lifecycle::{signals, startup, Shutdown};
use translator_service::observability::{logging, metrics};
use translator_service::provider::TranslationProvider;

#[derive(Parser)]
#[command(name = "translator-service")]
#[command(about = "HTTP machine translation service", long_about = None)]
struct Args {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long, env = "TRANSLATOR_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init_logging(&config.observability)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        app_version = %config.observability.app_version,
        "translator-service starting"
    );
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = ?config.provider.backend,
        models = config.models.len(),
        request_timeout_secs = config.timeouts.request_secs,
        inference_timeout_secs = config.limits.inference_timeout_secs,
        "Configuration loaded"
    );

    let handle = metrics::install_recorder()?;
    let registry = startup::build_registry(&config).await;
    let provider: Arc<dyn TranslationProvider> = registry;
    let listener = startup::bind(&config).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_task = {
        let shutdown = shutdown.clone();
        let provider = provider.clone();
        tokio::spawn(async move {
            if let Err(err) = signals::handle_signals(shutdown, provider).await {
                tracing::error!(error = %err, "Signal handling failed");
            }
        })
    };

    let server = HttpServer::new(config, provider, handle);
    server.run(listener, server_shutdown).await?;

    signal_task.abort();
    tracing::info!("Shutdown complete");
    Ok(())
}
