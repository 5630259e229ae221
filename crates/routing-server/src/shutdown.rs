//! Graceful shutdown handling.
//!
//! Listens for SIGTERM and ctrl-c; once a signal arrives the server stops
//! accepting connections and in-flight requests get the configured grace
//! period to drain before the process exits.

use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

/// Resolve when a shutdown signal arrives
///
/// After the first signal, a background watchdog enforces the grace
/// period: if draining takes longer, the process exits anyway.
pub async fn shutdown_signal(grace: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install ctrl-c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => warn!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received ctrl-c, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }

    info!(grace_secs = grace.as_secs(), "Draining in-flight requests");

    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        warn!("Shutdown grace period elapsed, exiting");
        std::process::exit(0);
    });
}
