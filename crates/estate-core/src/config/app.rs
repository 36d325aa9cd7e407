//! Listener and cross-origin settings of the portal server.

use serde::{Deserialize, Serialize};

/// Where the portal listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// `host:port` as handed to the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: CorsConfig::default(),
        }
    }
}

/// Cross-origin access to the auth relay.
///
/// The relay sets credentialed cookies, so wildcard origins are never
/// honoured; every trusted origin must be listed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Trusted origins. Empty keeps the portal same-origin only.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,
    /// Preflight cache lifetime.
    #[serde(default = "default_max_age")]
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: default_allowed_methods(),
            max_age_seconds: default_max_age(),
        }
    }
}

impl CorsConfig {
    /// Whether no foreign origin may call the portal.
    pub fn is_same_origin_only(&self) -> bool {
        self.allowed_origins.is_empty()
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3000
}

fn default_allowed_methods() -> Vec<String> {
    ["GET", "POST", "OPTIONS"].map(String::from).to_vec()
}

fn default_max_age() -> u64 {
    60 * 60
}
