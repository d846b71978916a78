//! # Structured Logging
//!
//! Subscriber setup and span helpers built on the tracing ecosystem.
//!
//! In production the output is JSON lines; elsewhere it is the compact
//! human-readable format. `RUST_LOG`, when set, overrides the configured
//! default level.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LoggingConfig};
use crate::errors::{Error, Result};

/// Create a tracing span for request tracking.
///
/// ```rust,ignore
/// let span = request_span!("GET", "/health");
/// let span = request_span!("GET", "/health/provider", provider = "vault");
/// ```
#[macro_export]
macro_rules! request_span {
    ($method:expr, $path:expr) => {
        tracing::info_span!(
            "http_request",
            method = %$method,
            path = %$path,
            request_id = %uuid::Uuid::new_v4(),
            status = tracing::field::Empty
        )
    };
    ($method:expr, $path:expr, $($field:tt)*) => {
        tracing::info_span!(
            "http_request",
            method = %$method,
            path = %$path,
            request_id = %uuid::Uuid::new_v4(),
            status = tracing::field::Empty,
            $($field)*
        )
    };
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::config_with_source("Invalid log filter", Box::new(e)))?;

    let json_layer = config.json.then(|| tracing_subscriber::fmt::layer().json());
    let fmt_layer = (!config.json).then(|| tracing_subscriber::fmt::layer().with_target(true));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::config_with_source("Failed to install log subscriber", Box::new(e)))
}

/// Log configuration at startup. Never logs credentials.
pub fn log_config_info(config: &AppConfig) {
    let secrets = &config.secrets;
    tracing::info!(
        environment = %config.environment,
        server_address = %config.server.bind_address(),
        secret_provider = %secrets.provider,
        vault_addr = %secrets.vault.endpoint,
        vault_secret_path = %secrets.vault.secret_path,
        aws_region = %secrets.localstack.region,
        aws_secret_name = %secrets.localstack.secret_name,
        use_localstack = secrets.localstack.use_localstack,
        "Service configuration"
    );
}
