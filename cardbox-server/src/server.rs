//! HTTP server: builds the axum app and runs it until Ctrl-C.

use crate::api::api_router;
use crate::config::ServerConfig;
use crate::state::AppState;
use crate::static_files::serve_static;
use axum::Router;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;

/// Coarse per-request deadline applied at the connection layer.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Card API routes plus the static page fallback.
pub fn build_router(state: AppState) -> Router {
    api_router()
        .fallback(serve_static)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}

pub async fn serve(config: &ServerConfig, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.bind_address, config.port)).await?;
    let actual_port = listener.local_addr()?.port();

    if config.dist_dir.is_dir() {
        log::info!(target: "cardbox.server", "Serving production build from {}", config.dist_dir.display());
    } else {
        log::info!(
            target: "cardbox.server",
            "{} not found, serving from project root {} (dev mode)",
            config.dist_dir.display(),
            config.root_dir.display()
        );
    }
    log::info!(
        target: "cardbox.server",
        "HTTP server listening on http://{}:{}",
        config.bind_address,
        actual_port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!(target: "cardbox.server", "HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!(target: "cardbox.server", "Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!(target: "cardbox.server", "Shutdown signal received");
}
