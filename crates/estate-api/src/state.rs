//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use estate_auth::{GatePolicy, TokenAuthority};
use estate_core::config::AppConfig;
use estate_store::CookiePolicy;

/// Application state containing all shared dependencies.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// External token authority
    pub authority: Arc<dyn TokenAuthority>,
    /// Gatekeeper exemptions and expiry margin
    pub gate_policy: Arc<GatePolicy>,
    /// Attributes of the credential cookies
    pub cookie_policy: Arc<CookiePolicy>,
}

impl AppState {
    /// Derives the gatekeeper and cookie policies from `config`.
    pub fn new(config: AppConfig, authority: Arc<dyn TokenAuthority>) -> Self {
        let gate_policy = GatePolicy::new(&config.gatekeeper, &config.session);
        let cookie_policy = CookiePolicy::from_config(&config);
        Self {
            config: Arc::new(config),
            authority,
            gate_policy: Arc::new(gate_policy),
            cookie_policy: Arc::new(cookie_policy),
        }
    }
}
