//! # Secrets Demo
//!
//! A small HTTP service that loads its secrets from HashiCorp Vault or AWS
//! Secrets Manager (usually a LocalStack emulator) exactly once at startup,
//! validates them against a fixed schema and only then starts serving.
//!
//! ## Architecture
//!
//! ```text
//! config → provider factory → SecretsProvider → validation → SecretsStore → REST API
//! ```
//!
//! ## Core Components
//!
//! - **Secrets**: backend adapters, schema validation and the write-once store
//! - **REST API**: Axum server exposing health and demo endpoints
//! - **Setup**: `secrets-setup` binary that seeds local backends
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use secrets_demo::config::AppConfig;
//! use secrets_demo::secrets::{bootstrap_from_settings, BootstrapOptions, SecretsStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let (_provider, published) = bootstrap_from_settings(
//!         &config.secrets,
//!         SecretsStore::global(),
//!         BootstrapOptions::default(),
//!     )
//!     .await?;
//!     println!("{} secrets loaded", published.secrets.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod observability;
pub mod secrets;
pub mod setup;

// Re-export commonly used types
pub use config::{AppConfig, Environment};
pub use errors::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_available() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "secrets-demo");
    }
}
