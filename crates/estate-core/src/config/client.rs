//! Client runtime configuration.

use serde::{Deserialize, Serialize};

/// Settings of the long-lived client runtime (interceptor + coordinator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every request path is resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Refresh endpoint (same-origin relay).
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    /// Login endpoint (same-origin relay).
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Login page the runtime navigates to when the session is terminated.
    #[serde(default = "default_login_page")]
    pub login_page: String,
    /// Query parameter carrying the return target on the login page.
    #[serde(default = "default_return_param")]
    pub return_param: String,
    /// Paths whose 401 is returned as-is, without refresh or redirect.
    ///
    /// The refresh endpoint is always treated as listed here.
    #[serde(default = "default_no_refresh_paths")]
    pub no_refresh_paths: Vec<String>,
    /// Optional file backing the script-readable credential store.
    #[serde(default)]
    pub credential_file: Option<String>,
    /// Timeout applied by the HTTP client to each call, in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            refresh_path: default_refresh_path(),
            login_path: default_login_path(),
            login_page: default_login_page(),
            return_param: default_return_param(),
            no_refresh_paths: default_no_refresh_paths(),
            credential_file: None,
            request_timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_refresh_path() -> String {
    "/api/auth/refresh".to_string()
}

fn default_login_path() -> String {
    "/api/auth/login".to_string()
}

fn default_login_page() -> String {
    "/login".to_string()
}

fn default_return_param() -> String {
    "returnTo".to_string()
}

fn default_no_refresh_paths() -> Vec<String> {
    vec![
        "/api/auth/refresh".to_string(),
        "/api/auth/login".to_string(),
        "/api/auth/me".to_string(),
    ]
}

fn default_timeout() -> u64 {
    30
}
