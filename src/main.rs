//! Estate Portal server binary.
//!
//! `ESTATE_ENV` picks the configuration overlay (`config/{env}.toml`) and the
//! cookie security default; `RUST_LOG` overrides the configured log filter.

use tracing_subscriber::{EnvFilter, fmt};

use estate_core::config::{AppConfig, LogFormat, LoggingConfig};

const ENV_VAR: &str = "ESTATE_ENV";

#[tokio::main]
async fn main() {
    let environment = std::env::var(ENV_VAR).unwrap_or_else(|_| "development".into());
    let config = match AppConfig::load(&environment) {
        Ok(config) => config,
        Err(e) => {
            // The subscriber depends on the configuration, so stderr it is.
            eprintln!("estate-server: {e}");
            std::process::exit(2);
        }
    };

    install_subscriber(&config.logging);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        bind = %config.server.bind_addr(),
        authority = %config.auth.authority_url,
        secure_cookies = config.secure_cookies(),
        "Starting Estate Portal"
    );

    if let Err(e) = estate_api::run_server(config).await {
        tracing::error!(error = %e, "Portal exited with an error");
        std::process::exit(1);
    }
}

fn install_subscriber(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = fmt().with_env_filter(filter).with_target(true);

    match logging.format {
        LogFormat::Json => builder.json().with_current_span(false).init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}
