//! imagestore-server: HTTP API for documents and their image collections.
//!
//! Ties the metadata store and the image manager together behind an Axum
//! router. Provides:
//!
//! - Document metadata endpoints (create, replace, read, delete)
//! - Per-document image collection endpoints with optional contrast adjustment
//! - OpenAPI document and Swagger UI under `/api-docs`
//! - Graceful shutdown via signal handling

pub mod context;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;

use std::net::SocketAddr;

use imagestore_core::config::Config;

use crate::context::AppContext;

/// Start the imagestore server.
///
/// Opens the stores named in `config`, binds the listener and serves until a
/// shutdown signal is received.
pub async fn start(config: Config) -> imagestore_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| imagestore_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let ctx = AppContext::from_config(config)?;
    let app = router::build_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        imagestore_core::Error::Internal(format!("Failed to bind to {addr}: {e}"))
    })?;

    let local = listener.local_addr()?;
    tracing::info!("Starting server on {local}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
