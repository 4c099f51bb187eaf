//! OS signal handling.
//!
//! The first Ctrl+C starts a graceful shutdown; a second one while draining
//! kills the process with exit status 1.

use std::sync::Arc;

use crate::lifecycle::Shutdown;

/// Spawn the Ctrl+C watcher for `shutdown`.
pub fn spawn_signal_handler(shutdown: Arc<Shutdown>) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                return;
            }

            if shutdown.trigger() {
                tracing::info!("Development server shutting down.");
            } else {
                tracing::warn!("Development server force kill.");
                std::process::exit(1);
            }
        }
    });
}
