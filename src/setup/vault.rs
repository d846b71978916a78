//! Seed a Vault KV v2 engine with the sample secret set.

use std::collections::HashMap;

use anyhow::{bail, Context};
use serde_json::Value;
use tracing::info;
use vaultrs::client::VaultClient;
use vaultrs::error::ClientError;
use vaultrs::kv2;

use super::wait::{wait_until_ready, RetryPolicy};
use super::{missing_keys, sample_bundle};
use crate::secrets::provider::bundle_from_values;
use crate::secrets::vault::build_client;
use crate::secrets::{split_kv2_path, SecretBundle, VaultProviderConfig};

/// Wait for Vault, make sure the KV v2 mount exists, write the sample set
/// and read it back.
///
/// Overwriting an existing path creates a new secret version.
pub async fn setup_vault(config: &VaultProviderConfig, policy: &RetryPolicy) -> anyhow::Result<()> {
    let (mount, path) = split_kv2_path(&config.secret_path)?;
    let client = build_client(&config.endpoint, &config.token)?;

    info!(endpoint = %config.endpoint, mount = %mount, path = %path, "Setting up Vault");

    wait_for_vault(&client, policy).await?;
    ensure_kv_engine(&client, &mount).await?;
    write_secrets(&client, &mount, &path, &sample_bundle()).await?;
    verify_secrets(&client, &mount, &path).await?;

    info!(mount = %mount, path = %path, "Vault setup completed");
    Ok(())
}

async fn wait_for_vault(client: &VaultClient, policy: &RetryPolicy) -> anyhow::Result<()> {
    wait_until_ready("Vault", policy, || async move {
        let health = vaultrs::sys::health(client).await.map_err(|e| e.to_string())?;
        Ok(health.initialized && !health.sealed)
    })
    .await
}

/// Enable a KV v2 engine at `mount` unless one is already there.
async fn ensure_kv_engine(client: &VaultClient, mount: &str) -> anyhow::Result<()> {
    let mounts = vaultrs::sys::mount::list(client).await.context("Failed to list Vault mounts")?;

    if mounts.contains_key(&format!("{}/", mount)) {
        info!(mount = %mount, "KV secrets engine already enabled");
        return Ok(());
    }

    info!(mount = %mount, "Enabling KV v2 secrets engine");
    match vaultrs::sys::mount::enable(client, mount, "kv-v2", None).await {
        Ok(()) => {
            info!(mount = %mount, "KV v2 secrets engine enabled");
            Ok(())
        }
        Err(ClientError::APIError { errors, .. })
            if errors.iter().any(|e| e.contains("already in use")) =>
        {
            info!(mount = %mount, "KV secrets engine already exists");
            Ok(())
        }
        Err(e) => Err(e).context(format!("Failed to enable KV engine at '{}'", mount)),
    }
}

async fn write_secrets(
    client: &VaultClient,
    mount: &str,
    path: &str,
    secrets: &SecretBundle,
) -> anyhow::Result<()> {
    info!(mount = %mount, path = %path, count = secrets.len(), "Writing secrets to Vault");

    let metadata = kv2::set(client, mount, path, secrets)
        .await
        .with_context(|| format!("Failed to write secrets to '{}/{}'", mount, path))?;

    info!(
        version = metadata.version,
        keys = ?secrets.keys().collect::<Vec<_>>(),
        "Secrets written"
    );
    Ok(())
}

async fn verify_secrets(client: &VaultClient, mount: &str, path: &str) -> anyhow::Result<()> {
    let data: HashMap<String, Value> = kv2::read(client, mount, path)
        .await
        .with_context(|| format!("Failed to read back secrets from '{}/{}'", mount, path))?;
    let bundle = bundle_from_values(data).map_err(anyhow::Error::msg)?;

    let missing = missing_keys(&bundle);
    if !missing.is_empty() {
        bail!("Missing secrets after write: {}", missing.join(", "));
    }

    info!(count = bundle.len(), "Secrets verified");
    Ok(())
}
