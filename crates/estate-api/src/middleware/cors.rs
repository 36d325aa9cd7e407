//! CORS layer configuration.

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

use estate_core::config::CorsConfig;

/// Builds a CORS tower layer from configuration.
///
/// Credentialed requests are allowed, so origins are always listed
/// explicitly; an empty list keeps the portal same-origin only.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.is_same_origin_only() {
        debug!("No cross-origin callers configured");
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter(|o| {
            let wildcard = o.as_str() == "*";
            if wildcard {
                warn!("Ignoring wildcard CORS origin, credentialed cookies require explicit origins");
            }
            !wildcard
        })
        .filter_map(|o| o.parse().ok())
        .collect();

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(config.max_age_seconds))
}
