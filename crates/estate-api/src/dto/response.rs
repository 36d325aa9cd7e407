//! JSON bodies returned by the relay and health endpoints.
//!
//! Token bodies are returned as [`TokenResponse`](estate_core::types::TokenResponse)
//! unwrapped, matching what the authority itself answers.

use serde::Serialize;

/// `{"success": true, "data": ...}` envelope for everything but token pairs.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Error body: a stable code plus a message safe to show.
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: &'static str,
    pub message: String,
}

/// Liveness report.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub environment: String,
    /// Whether session cookies are issued with `Secure`.
    pub secure_cookies: bool,
}

/// Names of the cookies a logout expired.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub cleared: [&'static str; 2],
}
