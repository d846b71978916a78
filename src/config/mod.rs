//! # Configuration Management
//!
//! Configuration is read from environment-style key/value pairs, with a
//! `.env` file loaded first when present. Every key has a default so the
//! service starts against local Vault or LocalStack out of the box.

pub mod settings;

pub use settings::{
    AppConfig, Environment, LoggingConfig, RateLimitConfig, SecretsSettings, ServerConfig,
};

/// Load `.env` into the process environment. A missing file is not an error.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => eprintln!("Warning: failed to load .env file: {}", e),
    }
}
