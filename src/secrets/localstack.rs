//! AWS Secrets Manager adapter
//!
//! Talks to the real service or, with `use_localstack`, to a LocalStack
//! emulator at a custom endpoint. The secret value must be a JSON object of
//! string pairs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_sdk_secretsmanager::config::retry::RetryConfig;
use aws_sdk_secretsmanager::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_secretsmanager::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use validator::Validate;

use super::error::{Result, SecretsError};
use super::provider::{bundle_from_values, SecretsProvider};
use super::types::{SecretBundle, SecretProviderType, SecretString};

const PROVIDER: SecretProviderType = SecretProviderType::LocalStack;

/// Connection settings for the Secrets Manager adapter.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LocalStackProviderConfig {
    #[validate(length(min = 1))]
    pub region: String,

    pub access_key_id: String,

    pub secret_access_key: SecretString,

    /// Secret id or name, e.g. `/widget-server/secrets`
    #[validate(length(min = 1))]
    pub secret_name: String,

    /// Endpoint override, used only in emulator mode
    #[validate(url)]
    pub endpoint: Option<String>,

    pub use_localstack: bool,
}

impl LocalStackProviderConfig {
    /// The endpoint the client will actually talk to, if overridden.
    pub fn effective_endpoint(&self) -> Option<&str> {
        if self.use_localstack {
            self.endpoint.as_deref()
        } else {
            None
        }
    }
}

/// Build a Secrets Manager client with static credentials.
///
/// Retries are disabled; a failed call surfaces immediately.
pub(crate) fn build_client(config: &LocalStackProviderConfig) -> Client {
    let credentials = Credentials::new(
        config.access_key_id.clone(),
        config.secret_access_key.expose_secret().to_string(),
        None,
        None,
        "secrets-demo",
    );

    let mut builder = aws_sdk_secretsmanager::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .credentials_provider(credentials)
        .retry_config(RetryConfig::disabled());

    if let Some(endpoint) = config.effective_endpoint() {
        builder = builder.endpoint_url(endpoint);
    }

    Client::from_conf(builder.build())
}

pub(crate) fn is_not_found<E>(err: &SdkError<E>) -> bool
where
    E: ProvideErrorMetadata,
{
    match err {
        SdkError::ServiceError(context) => {
            context.err().code() == Some("ResourceNotFoundException")
        }
        _ => false,
    }
}

/// Secrets provider backed by AWS Secrets Manager.
pub struct LocalStackProvider {
    client: Client,
    secret_name: String,
    endpoint: Option<String>,
}

impl std::fmt::Debug for LocalStackProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStackProvider")
            .field("secret_name", &self.secret_name)
            .field("endpoint", &self.endpoint)
            .field("client", &"[SecretsManagerClient]")
            .finish()
    }
}

impl LocalStackProvider {
    /// Construct the adapter. Performs no I/O.
    pub fn new(config: &LocalStackProviderConfig) -> Result<Self> {
        config.validate().map_err(|e| {
            SecretsError::provider_init_with_source(
                PROVIDER.as_str(),
                "Invalid Secrets Manager provider configuration",
                e,
            )
        })?;

        let client = build_client(config);
        let endpoint = config.effective_endpoint().map(str::to_string);

        info!(
            region = %config.region,
            secret_name = %config.secret_name,
            endpoint = endpoint.as_deref().unwrap_or("aws"),
            use_localstack = config.use_localstack,
            "Initialized Secrets Manager provider"
        );

        Ok(Self { client, secret_name: config.secret_name.clone(), endpoint })
    }

    pub fn secret_name(&self) -> &str {
        &self.secret_name
    }

    fn parse_secret_string(&self, raw: Option<&str>) -> Result<SecretBundle> {
        let raw = match raw {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                return Err(SecretsError::load(
                    PROVIDER,
                    format!("Secret '{}' has no string value", self.secret_name),
                ))
            }
        };

        let object: BTreeMap<String, Value> = serde_json::from_str(raw).map_err(|e| {
            SecretsError::load_with_source(
                PROVIDER,
                format!("Secret '{}' is not a JSON object", self.secret_name),
                e,
            )
        })?;

        bundle_from_values(object).map_err(|reason| {
            SecretsError::load(
                PROVIDER,
                format!("Secret '{}' is malformed: {}", self.secret_name, reason),
            )
        })
    }
}

#[async_trait]
impl SecretsProvider for LocalStackProvider {
    fn name(&self) -> SecretProviderType {
        PROVIDER
    }

    async fn load_secrets(&self) -> Result<SecretBundle> {
        debug!(secret_name = %self.secret_name, "Loading secrets from Secrets Manager");

        let output =
            self.client.get_secret_value().secret_id(&self.secret_name).send().await.map_err(
                |e| {
                    error!(
                        secret_name = %self.secret_name,
                        error = %DisplayErrorContext(&e),
                        "Failed to retrieve secret"
                    );
                    let message = if is_not_found(&e) {
                        format!("Secret '{}' not found", self.secret_name)
                    } else {
                        format!("Failed to retrieve secret '{}'", self.secret_name)
                    };
                    SecretsError::load_with_source(PROVIDER, message, e)
                },
            )?;

        let bundle = self.parse_secret_string(output.secret_string()).inspect_err(|e| {
            error!(secret_name = %self.secret_name, error = %e, "Invalid secret payload");
        })?;

        info!(
            count = bundle.len(),
            keys = ?bundle.keys().collect::<Vec<_>>(),
            version_id = output.version_id().unwrap_or("unknown"),
            "Loaded secrets from Secrets Manager"
        );

        Ok(bundle)
    }

    /// A read of the configured secret. Nothing is written.
    async fn health_check(&self) -> bool {
        match self.client.get_secret_value().secret_id(&self.secret_name).send().await {
            Ok(_) => true,
            Err(e) => {
                warn!(
                    secret_name = %self.secret_name,
                    error = %DisplayErrorContext(&e),
                    "Secrets Manager health check failed"
                );
                false
            }
        }
    }
}
