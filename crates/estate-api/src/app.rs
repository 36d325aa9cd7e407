//! Application builder: wires state, router and listener.

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn;
use tower_http::trace::TraceLayer;
use tracing::info;

use estate_auth::HttpTokenAuthority;
use estate_core::config::AppConfig;
use estate_core::error::{AppError, ErrorKind};

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(from_fn(request_logging))
}

/// Runs the portal server until Ctrl+C.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!(authority = %config.auth.authority_url, "Connecting token authority client");
    let authority = Arc::new(HttpTokenAuthority::new(&config.auth)?);

    let addr = config.server.bind_addr();
    let state = AppState::new(config, authority);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to bind {addr}")).caused_by(e))?;

    info!("Estate portal listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("Estate portal stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
