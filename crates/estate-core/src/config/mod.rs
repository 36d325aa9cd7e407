//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field carries a default so an empty source still yields
//! a usable configuration.

pub mod app;
pub mod auth;
pub mod client;
pub mod gatekeeper;
pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::client::ClientConfig;
pub use self::gatekeeper::GatekeeperConfig;
pub use self::logging::{LogFormat, LoggingConfig};
pub use self::session::{SameSitePolicy, SessionConfig};

use crate::error::AppError;

/// Name of the production environment.
pub const PRODUCTION: &str = "production";

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration files
/// (default.toml + environment overlay + `ESTATE__*` variables).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment (`"development"`, `"production"`, ...).
    #[serde(default = "default_environment")]
    pub environment: String,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// External token authority settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Cookie and refresh-window settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Pre-render gatekeeper settings.
    #[serde(default)]
    pub gatekeeper: GatekeeperConfig,
    /// Client runtime settings.
    #[serde(default)]
    pub client: ClientConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            session: SessionConfig::default(),
            gatekeeper: GatekeeperConfig::default(),
            client: ClientConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `ESTATE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .set_default("environment", env)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ESTATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Whether the portal runs in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case(PRODUCTION)
    }

    /// Whether cookies must carry the `Secure` attribute.
    ///
    /// An explicit `session.secure_cookies` wins; otherwise production only.
    pub fn secure_cookies(&self) -> bool {
        self.session
            .secure_cookies
            .unwrap_or_else(|| self.is_production())
    }
}

fn default_environment() -> String {
    "development".to_string()
}
