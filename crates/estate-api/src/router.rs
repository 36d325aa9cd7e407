//! Route definitions for the portal server.
//!
//! Pages live at the root, the auth relay and health under `/api`. Routes
//! are registered with full paths so the gatekeeper sees the same path its
//! exemption list names.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Same-origin login relay.
pub const LOGIN_RELAY: &str = "/api/auth/login";

/// Build the router with every route behind the gatekeeper.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(auth_routes())
        .merge(health_routes())
        .merge(page_routes())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::gatekeeper::gatekeeper,
        ))
        .with_state(state)
}

/// Auth relay: login, refresh, logout
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(LOGIN_RELAY, post(handlers::auth::login))
        .route("/api/auth/refresh", post(handlers::auth::refresh))
        .route("/api/auth/logout", post(handlers::auth::logout))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/api/health", get(handlers::health::health))
}

fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::pages::home))
        .route("/login", get(handlers::pages::login_page))
}
