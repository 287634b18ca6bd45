//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGTERM, SIGINT, SIGHUP)
//! - SIGTERM/SIGINT trigger graceful shutdown
//! - SIGHUP clears remembered model load failures
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP never shuts the service down
//! - Non-unix targets only get Ctrl+C

use std::sync::Arc;

use crate::lifecycle::shutdown::Shutdown;
use crate::provider::TranslationProvider;

/// Wait for signals until a shutdown signal arrives, then trigger `shutdown`.
#[cfg(unix)]
pub async fn handle_signals(
    shutdown: Shutdown,
    provider: Arc<dyn TranslationProvider>,
) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                tracing::info!(signal = "SIGINT", "Shutting down");
                break;
            }
            _ = terminate.recv() => {
                tracing::info!(signal = "SIGTERM", "Shutting down");
                break;
            }
            _ = hangup.recv() => {
                let cleared = provider.reset();
                tracing::info!(signal = "SIGHUP", cleared, "Model failures reset");
            }
        }
    }

    shutdown.trigger();
    Ok(())
}

#[cfg(not(unix))]
pub async fn handle_signals(
    shutdown: Shutdown,
    _provider: Arc<dyn TranslationProvider>,
) -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::info!(signal = "ctrl_c", "Shutting down");
    shutdown.trigger();
    Ok(())
}
