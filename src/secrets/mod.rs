//! Secret loading for application startup.
//!
//! Secrets come from exactly one backend, chosen by configuration:
//! - **HashiCorp Vault**: a single path of a KV v2 engine
//! - **AWS Secrets Manager**: a single named secret holding a JSON object,
//!   usually served by a LocalStack emulator during development
//!
//! # Architecture
//!
//! Every backend adapter implements the [`SecretsProvider`] trait:
//! - **name**: the fixed backend label
//! - **load_secrets**: fetch the raw [`SecretBundle`]
//! - **health_check**: best-effort check, never fails
//!
//! [`SecretsProviderFactory`] picks the adapter from the provider token.
//! [`bootstrap_secrets`] loads the bundle once, runs it through
//! [`validate_secrets`] and publishes the [`ValidatedSecrets`] into a
//! write-once [`SecretsStore`].
//!
//! # Example
//!
//! ```rust,ignore
//! use secrets_demo::config::AppConfig;
//! use secrets_demo::secrets::{bootstrap_from_settings, BootstrapOptions, SecretsStore};
//!
//! let config = AppConfig::from_env()?;
//! let (provider, published) = bootstrap_from_settings(
//!     &config.secrets,
//!     SecretsStore::global(),
//!     BootstrapOptions { mirror_env: true },
//! )
//! .await?;
//!
//! println!("database host: {}", published.secrets.database.host);
//! ```
//!
//! # Security Considerations
//!
//! - Secret values are never logged; only key names and counts are
//! - Passwords and API keys are held in [`SecretString`], zeroed on drop
//! - Health checks only read from the backend

pub mod bootstrap;
pub mod error;
pub mod factory;
pub mod localstack;
pub mod provider;
pub mod types;
pub mod validation;
pub mod vault;

pub use bootstrap::{
    bootstrap_from_settings, bootstrap_secrets, mirror_to_env, BootstrapOptions,
    PublishedSecrets, SecretsStore,
};
pub use error::{Result, SecretsError};
pub use factory::{AnyProvider, ProviderConfig, SecretsProviderFactory};
pub use localstack::{LocalStackProvider, LocalStackProviderConfig};
pub use provider::SecretsProvider;
pub use types::{SecretBundle, SecretProviderType, SecretString};
pub use validation::{
    validate_secrets, CloudflareSecrets, DatabaseSecrets, FieldIssue, NewRelicSecrets,
    ValidatedSecrets,
};
pub use vault::{split_kv2_path, VaultProvider, VaultProviderConfig};
