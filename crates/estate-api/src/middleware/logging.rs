//! Access log.
//!
//! Login redirects are logged with their target so a bounced navigation can
//! be traced to the gatekeeper. Query strings are left out; cookies and
//! `Authorization` are never touched.

use std::time::Instant;

use axum::extract::Request;
use axum::http::header::LOCATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

/// One line per request: method, path, status, latency.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    let location = response.headers().get(LOCATION).and_then(|v| v.to_str().ok());

    if status.is_server_error() {
        warn!(%method, %path, status = status.as_u16(), elapsed_ms, "Request failed");
    } else if let Some(location) = location {
        info!(%method, %path, status = status.as_u16(), elapsed_ms, location, "Request redirected");
    } else {
        info!(%method, %path, status = status.as_u16(), elapsed_ms, "Request served");
    }

    response
}
