//! Graceful shutdown on SIGINT or SIGTERM.

use std::time::Duration;

use tokio::signal::ctrl_c;

use crate::TRACING_TARGET_SERVER_SHUTDOWN;

/// Resolves once Ctrl+C or (on unix) SIGTERM arrives.
///
/// A handler that fails to install is logged and never fires, so the
/// other signal still works.
pub async fn shutdown_signal(shutdown_timeout: Duration) {
    let interrupt = async {
        match ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    error = %err,
                    "failed to install Ctrl+C handler"
                );
                std::future::pending().await
            }
        }
    };

    let signal = tokio::select! {
        signal = interrupt => signal,
        signal = terminate() => signal,
    };

    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        signal,
        timeout_secs = shutdown_timeout.as_secs(),
        "graceful shutdown initiated"
    );
}

#[cfg(unix)]
async fn terminate() -> &'static str {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
            "SIGTERM"
        }
        Err(err) => {
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = %err,
                "failed to install SIGTERM handler"
            );
            std::future::pending().await
        }
    }
}

#[cfg(not(unix))]
async fn terminate() -> &'static str {
    std::future::pending().await
}
