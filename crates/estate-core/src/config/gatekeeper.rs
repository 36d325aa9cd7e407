//! Pre-render gatekeeper configuration.

use serde::{Deserialize, Serialize};

/// Paths the gatekeeper treats specially.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatekeeperConfig {
    /// Login page; target of every session redirect.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Same-origin refresh relay endpoint.
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    /// Additional exact paths that bypass the gatekeeper.
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
    /// Path prefixes of static assets.
    #[serde(default = "default_static_prefixes")]
    pub static_prefixes: Vec<String>,
    /// Query parameter carrying the original destination on the login page.
    #[serde(default = "default_return_param")]
    pub return_param: String,
}

impl Default for GatekeeperConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            refresh_path: default_refresh_path(),
            public_paths: default_public_paths(),
            static_prefixes: default_static_prefixes(),
            return_param: default_return_param(),
        }
    }
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_refresh_path() -> String {
    "/api/auth/refresh".to_string()
}

fn default_public_paths() -> Vec<String> {
    vec![
        "/api/auth/login".to_string(),
        "/api/auth/logout".to_string(),
        "/api/health".to_string(),
        "/favicon.ico".to_string(),
        "/robots.txt".to_string(),
    ]
}

fn default_static_prefixes() -> Vec<String> {
    vec![
        "/static/".to_string(),
        "/assets/".to_string(),
        "/_next/".to_string(),
    ]
}

fn default_return_param() -> String {
    "returnTo".to_string()
}
