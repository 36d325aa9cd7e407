//! Session cookie and refresh-window configuration.

use serde::{Deserialize, Serialize};

/// Cookie attributes and refresh timing shared by the gatekeeper and relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Remaining access-token lifetime below which a proactive refresh runs.
    #[serde(default = "default_refresh_margin")]
    pub refresh_margin_seconds: u64,
    /// Max-age of the refresh-token cookie.
    #[serde(default = "default_refresh_max_age")]
    pub refresh_cookie_max_age_seconds: u64,
    /// Cookie path.
    #[serde(default = "default_cookie_path")]
    pub cookie_path: String,
    /// `SameSite` attribute of both cookies.
    #[serde(default)]
    pub same_site: SameSitePolicy,
    /// Explicit `Secure` attribute. `None` means "production only".
    #[serde(default)]
    pub secure_cookies: Option<bool>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_margin_seconds: default_refresh_margin(),
            refresh_cookie_max_age_seconds: default_refresh_max_age(),
            cookie_path: default_cookie_path(),
            same_site: SameSitePolicy::default(),
            secure_cookies: None,
        }
    }
}

/// `SameSite` cookie policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SameSitePolicy {
    /// Sent on top-level navigations and same-site requests.
    #[default]
    Lax,
    /// Same-site requests only.
    Strict,
    /// Sent everywhere (requires `Secure`).
    None,
}

impl std::fmt::Display for SameSitePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SameSitePolicy::Lax => write!(f, "lax"),
            SameSitePolicy::Strict => write!(f, "strict"),
            SameSitePolicy::None => write!(f, "none"),
        }
    }
}

fn default_refresh_margin() -> u64 {
    5 * 60
}

fn default_refresh_max_age() -> u64 {
    7 * 24 * 60 * 60
}

fn default_cookie_path() -> String {
    "/".to_string()
}
