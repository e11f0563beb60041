//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGTERM / SIGINT (Ctrl-C on Windows)
//! - Translate them into a [`Shutdown`] trigger
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - A handler that can't be installed is logged; the process then only
//!   stops through the programmatic trigger

use crate::lifecycle::Shutdown;

/// Wait for a `SIGTERM` or `SIGINT`.
#[cfg(unix)]
pub async fn wait_for_os_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut term, mut int) = match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(term), Ok(int)) => (term, int),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(error = %e, "Failed to register signal handler");
            return std::future::pending().await;
        }
    };

    tokio::select! {
        _ = term.recv() => tracing::info!("Received SIGTERM"),
        _ = int.recv() => tracing::info!("Received SIGINT"),
    }
}

/// Wait for a `ctrl+c`.
#[cfg(windows)]
pub async fn wait_for_os_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received SIGINT"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to register Ctrl-C handler");
            std::future::pending::<()>().await
        }
    }
}

/// Trigger `shutdown` on the first OS signal.
pub fn forward_os_signals(shutdown: Shutdown) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_os_signal().await;
        shutdown.trigger();
    })
}
