//! HTTP server startup with graceful shutdown.

mod error;
mod lifecycle;
mod shutdown;

use std::net::SocketAddr;

use axum::Router;
pub use error::{ServerError, ServerResult};
use tokio::net::TcpListener;

use crate::TRACING_TARGET_SERVER_STARTUP;
use crate::config::ServerConfig;
use crate::server::lifecycle::serve_with_shutdown;
use crate::server::shutdown::shutdown_signal;

/// Binds to the configured address and serves `app` until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
/// while running.
pub async fn serve(app: Router, config: ServerConfig) -> ServerResult<()> {
    let server_addr = config.server_addr();

    let listener = TcpListener::bind(server_addr).await.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %err,
            "Failed to bind to address"
        );
        let err = ServerError::bind_error(&server_addr.to_string(), err);
        if let Some(suggestion) = err.suggestion() {
            tracing::info!(
                target: TRACING_TARGET_SERVER_STARTUP,
                suggestion,
                "Recovery suggestion"
            );
        }
        err
    })?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_addr,
        "Server is ready and listening for connections"
    );

    let shutdown = shutdown_signal(config.shutdown_timeout());
    serve_with_shutdown(&config, || async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
    })
    .await
    .map_err(ServerError::Runtime)
}
