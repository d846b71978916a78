//! Fixtures shared by handler tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::api::routes::ApiState;
use crate::config::Environment;
use crate::secrets::{
    validate_secrets, PublishedSecrets, SecretBundle, SecretProviderType, SecretsProvider,
};

#[derive(Debug)]
pub struct FakeProvider {
    healthy: bool,
}

impl FakeProvider {
    pub fn healthy() -> Self {
        Self { healthy: true }
    }

    pub fn unhealthy() -> Self {
        Self { healthy: false }
    }
}

#[async_trait]
impl SecretsProvider for FakeProvider {
    fn name(&self) -> SecretProviderType {
        SecretProviderType::Vault
    }

    async fn load_secrets(&self) -> crate::secrets::Result<SecretBundle> {
        Ok(sample_bundle())
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }
}

pub fn sample_bundle() -> SecretBundle {
    [
        ("DATABASE_HOST", "localhost"),
        ("DATABASE_PORT", "5432"),
        ("DATABASE_USER", "postgres"),
        ("DATABASE_PASSWORD", "dev_password_123"),
        ("DATABASE_NAME", "app"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub fn test_state(provider: FakeProvider) -> ApiState {
    let secrets = validate_secrets(&sample_bundle()).expect("sample bundle is valid");
    let published = PublishedSecrets {
        secrets: Arc::new(secrets),
        provider: SecretProviderType::Vault,
        loaded_at: Utc::now(),
    };
    ApiState::new(published, Arc::new(provider), Environment::Test)
}
