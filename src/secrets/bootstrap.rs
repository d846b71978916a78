//! # Secrets Bootstrap
//!
//! The one-shot startup routine: load the bundle, validate it, publish it.
//! It runs before the HTTP listener is bound; any failure aborts startup.
//!
//! Published secrets live in a [`SecretsStore`], a write-once cell. The gate
//! is its only writer; request handlers read it afterwards.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use super::error::{Result, SecretsError};
use super::factory::{AnyProvider, SecretsProviderFactory};
use super::provider::SecretsProvider;
use super::types::SecretProviderType;
use super::validation::{validate_secrets, ValidatedSecrets};
use crate::config::SecretsSettings;

/// Secrets as published by a successful bootstrap.
#[derive(Debug, Clone)]
pub struct PublishedSecrets {
    pub secrets: Arc<ValidatedSecrets>,
    pub provider: SecretProviderType,
    pub loaded_at: DateTime<Utc>,
}

/// Write-once holder for the validated secrets.
#[derive(Debug, Default)]
pub struct SecretsStore {
    cell: OnceCell<PublishedSecrets>,
}

static GLOBAL_STORE: SecretsStore = SecretsStore::new();

impl SecretsStore {
    pub const fn new() -> Self {
        Self { cell: OnceCell::new() }
    }

    /// The process-wide store used by the server binary.
    pub fn global() -> &'static SecretsStore {
        &GLOBAL_STORE
    }

    /// Published secrets, or `None` before a successful bootstrap.
    pub fn get(&self) -> Option<&PublishedSecrets> {
        self.cell.get()
    }

    pub fn is_published(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Publish once. A second call fails and leaves the first value in place.
    pub fn publish(&self, published: PublishedSecrets) -> Result<&PublishedSecrets> {
        self.cell.try_insert(published).map_err(|_| SecretsError::AlreadyPublished)
    }
}

/// Knobs for [`bootstrap_secrets`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BootstrapOptions {
    /// Copy every validated value into the process environment under its
    /// original key. For code that still reads `std::env`.
    pub mirror_env: bool,
}

/// Copy validated values into the process environment.
///
/// Process-global write. No other thread may read or write the environment
/// while this runs, so call it during startup, before any task is spawned
/// and before the listener is bound.
pub fn mirror_to_env(secrets: &ValidatedSecrets) {
    for (key, value) in secrets.exposed_entries() {
        std::env::set_var(key, value);
    }
    debug!(count = secrets.len(), "Mirrored secrets into process environment");
}

/// Load, validate and publish secrets from `provider` into `store`.
///
/// Nothing is published, and the environment is left untouched, unless
/// both the load and the validation succeed.
pub async fn bootstrap_secrets<'s, P>(
    provider: &P,
    store: &'s SecretsStore,
    options: BootstrapOptions,
) -> Result<&'s PublishedSecrets>
where
    P: SecretsProvider + ?Sized,
{
    let provider_type = provider.name();
    info!(provider = %provider_type, "Loading secrets");

    let bundle = provider.load_secrets().await?;
    let secrets = validate_secrets(&bundle).inspect_err(|e| {
        warn!(provider = %provider_type, error = %e, "Loaded secrets failed validation");
    })?;

    let published = store.publish(PublishedSecrets {
        secrets: Arc::new(secrets),
        provider: provider_type,
        loaded_at: Utc::now(),
    })?;

    if options.mirror_env {
        mirror_to_env(&published.secrets);
    }

    info!(
        provider = %provider_type,
        count = published.secrets.len(),
        "Secrets loaded and validated"
    );

    Ok(published)
}

/// Resolve the configured provider, then run [`bootstrap_secrets`].
///
/// Returns the provider too, so health checks can reuse it.
pub async fn bootstrap_from_settings<'s>(
    settings: &SecretsSettings,
    store: &'s SecretsStore,
    options: BootstrapOptions,
) -> Result<(AnyProvider, &'s PublishedSecrets)> {
    let provider = SecretsProviderFactory::create(&settings.provider, settings)?;
    let published = bootstrap_secrets(&provider, store, options).await?;
    Ok((provider, published))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::types::SecretBundle;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct StaticProvider(SecretBundle);

    #[async_trait]
    impl SecretsProvider for StaticProvider {
        fn name(&self) -> SecretProviderType {
            SecretProviderType::Vault
        }

        async fn load_secrets(&self) -> Result<SecretBundle> {
            Ok(self.0.clone())
        }

        async fn health_check(&self) -> bool {
            true
        }
    }

    fn bundle(pairs: &[(&str, &str)]) -> SecretBundle {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn complete() -> SecretBundle {
        bundle(&[
            ("DATABASE_HOST", "localhost"),
            ("DATABASE_PORT", "5432"),
            ("DATABASE_USER", "postgres"),
            ("DATABASE_PASSWORD", "dev_password_123"),
            ("DATABASE_NAME", "app"),
        ])
    }

    #[tokio::test]
    async fn test_bootstrap_publishes_validated_secrets() {
        let store = SecretsStore::new();
        let provider = StaticProvider(complete());

        let published =
            bootstrap_secrets(&provider, &store, BootstrapOptions::default()).await.unwrap();

        assert_eq!(published.provider, SecretProviderType::Vault);
        assert_eq!(published.secrets.database.port, 5432);
        assert!(store.is_published());
    }

    #[tokio::test]
    async fn test_validation_failure_publishes_nothing() {
        let store = SecretsStore::new();
        let mut incomplete = complete();
        incomplete.remove("DATABASE_PASSWORD");

        let provider = StaticProvider(incomplete);
        let err =
            bootstrap_secrets(&provider, &store, BootstrapOptions::default()).await.unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("DATABASE_PASSWORD"));
        assert!(store.get().is_none());
    }

    #[tokio::test]
    async fn test_second_publish_is_rejected() {
        let store = SecretsStore::new();
        let provider = StaticProvider(complete());

        bootstrap_secrets(&provider, &store, BootstrapOptions::default()).await.unwrap();
        let first_loaded_at = store.get().map(|p| p.loaded_at);

        let err = bootstrap_secrets(&provider, &store, BootstrapOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SecretsError::AlreadyPublished));
        assert_eq!(store.get().map(|p| p.loaded_at), first_loaded_at);
    }

    #[tokio::test]
    async fn test_dyn_provider_is_accepted() {
        let store = SecretsStore::new();
        let provider: Box<dyn SecretsProvider> = Box::new(StaticProvider(complete()));

        bootstrap_secrets(provider.as_ref(), &store, BootstrapOptions::default()).await.unwrap();
        assert!(store.is_published());
    }
}
