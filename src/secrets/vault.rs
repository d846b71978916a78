//! HashiCorp Vault adapter
//!
//! Reads the whole secret bundle from a single path of a KV v2 engine.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use validator::Validate;
use vaultrs::client::{VaultClient, VaultClientSettingsBuilder};
use vaultrs::kv2;

use super::error::{Result, SecretsError};
use super::provider::{bundle_from_values, SecretsProvider};
use super::types::{SecretBundle, SecretProviderType, SecretString};

const PROVIDER: SecretProviderType = SecretProviderType::Vault;

/// Connection settings for the Vault adapter.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VaultProviderConfig {
    /// Vault server address, e.g. `http://localhost:8200`
    #[validate(url)]
    pub endpoint: String,

    pub token: SecretString,

    /// Full KV v2 API path: `<mount>/data/<path>`
    #[validate(length(min = 1))]
    pub secret_path: String,
}

/// Split a KV v2 API path into `(mount, path)`.
///
/// The first segment is the mount. A `data` segment right after it is the
/// API prefix and is dropped. Both `secret/data/app` and `secret/app` give
/// `("secret", "app")`.
pub fn split_kv2_path(secret_path: &str) -> Result<(String, String)> {
    let trimmed = secret_path.trim_matches('/');
    let mut segments = trimmed.splitn(2, '/');

    let mount = segments.next().filter(|m| !m.is_empty());
    let rest = segments.next().unwrap_or_default();
    let rest = match rest.strip_prefix("data") {
        Some("") => "",
        Some(after) if after.starts_with('/') => after.trim_start_matches('/'),
        _ => rest,
    };

    match mount {
        Some(mount) if !rest.is_empty() => Ok((mount.to_string(), rest.to_string())),
        _ => Err(SecretsError::provider_init(
            PROVIDER.as_str(),
            format!("Invalid secret path '{}': expected '<mount>/data/<path>'", secret_path),
        )),
    }
}

/// Build a token-authenticated client for `endpoint`.
pub(crate) fn build_client(endpoint: &str, token: &SecretString) -> Result<VaultClient> {
    // The settings builder panics on unparsable addresses.
    url::Url::parse(endpoint).map_err(|e| {
        SecretsError::provider_init_with_source(
            PROVIDER.as_str(),
            format!("Invalid Vault address '{}'", endpoint),
            e,
        )
    })?;

    let mut settings_builder = VaultClientSettingsBuilder::default();
    settings_builder.address(endpoint);
    settings_builder.token(token.expose_secret());

    let settings = settings_builder.build().map_err(|e| {
        SecretsError::provider_init(
            PROVIDER.as_str(),
            format!("Invalid Vault client configuration: {}", e),
        )
    })?;

    VaultClient::new(settings).map_err(|e| {
        SecretsError::provider_init_with_source(
            PROVIDER.as_str(),
            "Failed to create Vault client",
            e,
        )
    })
}

/// Secrets provider backed by a Vault KV v2 engine.
pub struct VaultProvider {
    client: VaultClient,
    endpoint: String,
    mount: String,
    path: String,
}

impl std::fmt::Debug for VaultProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultProvider")
            .field("endpoint", &self.endpoint)
            .field("mount", &self.mount)
            .field("path", &self.path)
            .field("client", &"[VaultClient]")
            .finish()
    }
}

impl VaultProvider {
    /// Construct the adapter. Performs no I/O.
    pub fn new(config: &VaultProviderConfig) -> Result<Self> {
        config.validate().map_err(|e| {
            SecretsError::provider_init_with_source(
                PROVIDER.as_str(),
                "Invalid Vault provider configuration",
                e,
            )
        })?;

        let (mount, path) = split_kv2_path(&config.secret_path)?;
        let client = build_client(&config.endpoint, &config.token)?;

        info!(
            endpoint = %config.endpoint,
            mount = %mount,
            path = %path,
            "Initialized Vault secrets provider"
        );

        Ok(Self { client, endpoint: config.endpoint.clone(), mount, path })
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl SecretsProvider for VaultProvider {
    fn name(&self) -> SecretProviderType {
        PROVIDER
    }

    async fn load_secrets(&self) -> Result<SecretBundle> {
        debug!(mount = %self.mount, path = %self.path, "Loading secrets from Vault");

        let data: HashMap<String, Value> =
            kv2::read(&self.client, &self.mount, &self.path).await.map_err(|e| {
                error!(
                    mount = %self.mount,
                    path = %self.path,
                    error = %e,
                    "Failed to read secrets from Vault"
                );
                SecretsError::load_with_source(
                    PROVIDER,
                    format!(
                        "Failed to read secrets from path '{}/{}': {}",
                        self.mount, self.path, e
                    ),
                    e,
                )
            })?;

        let bundle = bundle_from_values(data).map_err(|reason| {
            error!(path = %self.path, reason = %reason, "Malformed secret data in Vault");
            SecretsError::load(
                PROVIDER,
                format!("Malformed secret data at path '{}/{}': {}", self.mount, self.path, reason),
            )
        })?;

        info!(
            count = bundle.len(),
            keys = ?bundle.keys().collect::<Vec<_>>(),
            "Loaded secrets from Vault"
        );

        Ok(bundle)
    }

    /// `sys/health` is an unauthenticated read; it never touches KV data.
    async fn health_check(&self) -> bool {
        match vaultrs::sys::health(&self.client).await {
            Ok(health) => {
                if !health.initialized || health.sealed {
                    warn!(
                        initialized = health.initialized,
                        sealed = health.sealed,
                        "Vault is not ready"
                    );
                }
                health.initialized && !health.sealed
            }
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "Vault health check failed");
                false
            }
        }
    }
}
