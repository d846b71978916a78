//! Seed a LocalStack Secrets Manager emulator with the sample secret set.

use std::collections::BTreeMap;

use anyhow::{bail, Context};
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::wait::{wait_until_ready, RetryPolicy};
use super::{missing_keys, sample_bundle};
use crate::config::SecretsSettings;
use crate::secrets::localstack::{build_client, is_not_found};
use crate::secrets::provider::bundle_from_values;
use crate::secrets::SecretBundle;

const SECRET_DESCRIPTION: &str = "Development secrets for Secrets Management Demo App";

#[derive(Debug, Deserialize)]
struct LocalStackHealth {
    #[serde(default)]
    services: BTreeMap<String, String>,
}

impl LocalStackHealth {
    fn secrets_manager_ready(&self) -> bool {
        matches!(
            self.services.get("secretsmanager").map(String::as_str),
            Some("available") | Some("running")
        )
    }
}

/// Wait for the emulator, replace the configured secret with the sample set
/// and read it back.
///
/// Always talks to `LOCALSTACK_ENDPOINT`, whatever `USE_LOCALSTACK` says.
pub async fn setup_localstack(
    settings: &SecretsSettings,
    policy: &RetryPolicy,
) -> anyhow::Result<()> {
    let endpoint = settings.localstack_endpoint.trim_end_matches('/');
    let secret_name = settings.localstack.secret_name.as_str();

    info!(endpoint = %endpoint, secret_name = %secret_name, "Setting up LocalStack");

    wait_for_localstack(endpoint, policy).await?;

    let mut config = settings.localstack.clone();
    config.endpoint = Some(endpoint.to_string());
    config.use_localstack = true;
    let client = build_client(&config);

    delete_existing(&client, secret_name).await?;
    create_secret(&client, secret_name, &sample_bundle()).await?;
    verify_secret(&client, secret_name).await?;

    info!(secret_name = %secret_name, "LocalStack setup completed");
    Ok(())
}

async fn wait_for_localstack(endpoint: &str, policy: &RetryPolicy) -> anyhow::Result<()> {
    let http = reqwest::Client::new();
    let url = format!("{}/_localstack/health", endpoint);

    wait_until_ready("LocalStack", policy, || {
        let request = http.get(&url);
        async move {
            let response = request.send().await.map_err(|e| e.to_string())?;
            if !response.status().is_success() {
                return Ok(false);
            }
            let health: LocalStackHealth = response.json().await.map_err(|e| e.to_string())?;
            Ok(health.secrets_manager_ready())
        }
    })
    .await
}

/// Force-delete the secret so the create below starts clean.
async fn delete_existing(client: &Client, secret_name: &str) -> anyhow::Result<()> {
    match client
        .delete_secret()
        .secret_id(secret_name)
        .force_delete_without_recovery(true)
        .send()
        .await
    {
        Ok(_) => info!(secret_name = %secret_name, "Deleted existing secret"),
        Err(e) if is_not_found(&e) => {}
        Err(e) => warn!(
            secret_name = %secret_name,
            error = %DisplayErrorContext(&e),
            "Failed to delete existing secret, continuing"
        ),
    }
    Ok(())
}

async fn create_secret(
    client: &Client,
    secret_name: &str,
    secrets: &SecretBundle,
) -> anyhow::Result<()> {
    let payload = serde_json::to_string_pretty(secrets)?;

    let output = client
        .create_secret()
        .name(secret_name)
        .secret_string(payload)
        .description(SECRET_DESCRIPTION)
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("{}", DisplayErrorContext(&e)))
        .with_context(|| format!("Failed to create secret '{}'", secret_name))?;

    info!(
        secret_name = %secret_name,
        arn = output.arn().unwrap_or("unknown"),
        keys = ?secrets.keys().collect::<Vec<_>>(),
        "Secret created"
    );
    Ok(())
}

async fn verify_secret(client: &Client, secret_name: &str) -> anyhow::Result<()> {
    let output = client
        .get_secret_value()
        .secret_id(secret_name)
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("{}", DisplayErrorContext(&e)))
        .with_context(|| format!("Failed to read back secret '{}'", secret_name))?;

    let raw = output.secret_string().context("Secret has no string value")?;
    let object: BTreeMap<String, Value> =
        serde_json::from_str(raw).context("Secret value is not a JSON object")?;
    let bundle = bundle_from_values(object).map_err(anyhow::Error::msg)?;

    let missing = missing_keys(&bundle);
    if !missing.is_empty() {
        bail!("Missing secrets after write: {}", missing.join(", "));
    }

    info!(count = bundle.len(), "Secret verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn health(json: &str) -> LocalStackHealth {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_secrets_manager_readiness() {
        let ready = |json: &str| health(json).secrets_manager_ready();

        assert!(ready(r#"{"services": {"secretsmanager": "available"}}"#));
        assert!(ready(r#"{"services": {"secretsmanager": "running"}}"#));
        assert!(!ready(r#"{"services": {"secretsmanager": "disabled"}}"#));
        assert!(!ready(r#"{"services": {"s3": "running"}}"#));
        assert!(!ready(r#"{"version": "3.0"}"#));
    }
}
