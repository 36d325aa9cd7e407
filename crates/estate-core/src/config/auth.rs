//! External token authority configuration.

use serde::{Deserialize, Serialize};

/// Where and how to reach the backend that issues tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Base URL of the token authority (e.g. `http://backend:8000`).
    #[serde(default = "default_authority_url")]
    pub authority_url: String,
    /// Path of the authority's login endpoint.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Path of the authority's refresh endpoint.
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    /// Timeout applied by the HTTP client to each authority call, in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            authority_url: default_authority_url(),
            login_path: default_login_path(),
            refresh_path: default_refresh_path(),
            request_timeout_seconds: default_timeout(),
        }
    }
}

impl AuthConfig {
    /// Full URL of the authority's refresh endpoint.
    pub fn refresh_url(&self) -> String {
        join_url(&self.authority_url, &self.refresh_path)
    }

    /// Full URL of the authority's login endpoint.
    pub fn login_url(&self) -> String {
        join_url(&self.authority_url, &self.login_path)
    }
}

/// Joins a base URL and a path without doubling or dropping the slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn default_authority_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_login_path() -> String {
    "/api/auth/login".to_string()
}

fn default_refresh_path() -> String {
    "/api/auth/refresh".to_string()
}

fn default_timeout() -> u64 {
    30
}
