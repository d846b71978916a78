//! Provider selection
//!
//! Maps the configured provider token onto a concrete adapter. No I/O
//! happens here; adapters connect lazily on first use.

use async_trait::async_trait;
use tracing::info;

use super::error::{Result, SecretsError};
use super::localstack::{LocalStackProvider, LocalStackProviderConfig};
use super::provider::SecretsProvider;
use super::types::{SecretBundle, SecretProviderType};
use super::vault::{VaultProvider, VaultProviderConfig};
use crate::config::SecretsSettings;

/// Configuration for exactly one adapter variant.
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    Vault(VaultProviderConfig),
    LocalStack(LocalStackProviderConfig),
}

impl ProviderConfig {
    pub fn provider_type(&self) -> SecretProviderType {
        match self {
            Self::Vault(_) => SecretProviderType::Vault,
            Self::LocalStack(_) => SecretProviderType::LocalStack,
        }
    }
}

/// The adapter selected at startup.
#[derive(Debug)]
pub enum AnyProvider {
    Vault(VaultProvider),
    LocalStack(LocalStackProvider),
}

#[async_trait]
impl SecretsProvider for AnyProvider {
    fn name(&self) -> SecretProviderType {
        match self {
            Self::Vault(p) => p.name(),
            Self::LocalStack(p) => p.name(),
        }
    }

    async fn load_secrets(&self) -> Result<SecretBundle> {
        match self {
            Self::Vault(p) => p.load_secrets().await,
            Self::LocalStack(p) => p.load_secrets().await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            Self::Vault(p) => p.health_check().await,
            Self::LocalStack(p) => p.health_check().await,
        }
    }
}

/// Builds the adapter named by a provider token.
pub struct SecretsProviderFactory;

impl SecretsProviderFactory {
    /// Create the adapter for `provider_type` using the matching section of
    /// `settings`.
    ///
    /// Any token other than `vault` or `localstack` fails with a
    /// `ProviderInit` error listing the valid options.
    pub fn create(provider_type: &str, settings: &SecretsSettings) -> Result<AnyProvider> {
        let provider_type: SecretProviderType = provider_type.parse().map_err(|e: String| {
            SecretsError::provider_init(
                provider_type,
                format!("{}. Valid options: {}", e, SecretProviderType::valid_options()),
            )
        })?;

        let config = match provider_type {
            SecretProviderType::Vault => ProviderConfig::Vault(settings.vault.clone()),
            SecretProviderType::LocalStack => {
                ProviderConfig::LocalStack(settings.localstack.clone())
            }
        };

        Self::from_config(&config)
    }

    /// Create the adapter for an already-selected configuration variant.
    pub fn from_config(config: &ProviderConfig) -> Result<AnyProvider> {
        let provider = match config {
            ProviderConfig::Vault(cfg) => AnyProvider::Vault(VaultProvider::new(cfg)?),
            ProviderConfig::LocalStack(cfg) => {
                AnyProvider::LocalStack(LocalStackProvider::new(cfg)?)
            }
        };

        info!(provider = %provider.name(), "Created secrets provider");
        Ok(provider)
    }

    /// The provider token configured in `settings`.
    pub fn current_provider(settings: &SecretsSettings) -> &str {
        &settings.provider
    }

    pub fn available_providers() -> &'static [SecretProviderType] {
        &SecretProviderType::ALL
    }
}
