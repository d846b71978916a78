//! Integration tests for the startup gate: load, validate, publish.

mod common;

use std::env;
use std::sync::Mutex;

use common::*;
use secrets_demo::secrets::{
    bootstrap_from_settings, BootstrapOptions, SecretProviderType, SecretsError, SecretsProvider,
    SecretsStore,
};
use serde_json::json;
use wiremock::MockServer;

// Serialize tests that touch the process environment
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const MIRROR: BootstrapOptions = BootstrapOptions { mirror_env: true };

#[tokio::test]
async fn test_vault_bootstrap_publishes_validated_secrets() {
    let server = MockServer::start().await;
    mount_vault_secret(
        &server,
        "widget-server",
        json!({
            "DATABASE_HOST": "db.internal",
            "DATABASE_PORT": "5432",
            "DATABASE_USER": "postgres",
            "DATABASE_PASSWORD": "dev_password_123",
            "DATABASE_NAME": "app_development",
            "UNRELATED_KEY": "ignored"
        }),
    )
    .await;

    let store = SecretsStore::new();
    let config = vault_config(&server.uri());
    let (provider, published) =
        bootstrap_from_settings(&config.secrets, &store, BootstrapOptions::default())
            .await
            .unwrap();

    assert_eq!(provider.name(), SecretProviderType::Vault);
    assert_eq!(published.provider, SecretProviderType::Vault);
    assert_eq!(published.secrets.database.port, 5432);
    assert_eq!(published.secrets.database.password.expose_secret(), "dev_password_123");
    assert!(published.secrets.cloudflare.api_key.is_none());
    assert!(!published.secrets.keys().contains(&"UNRELATED_KEY"));
    assert!(store.is_published());
}

#[tokio::test]
async fn test_localstack_bootstrap_publishes_validated_secrets() {
    let server = MockServer::start().await;
    let payload = serde_json::to_string(&valid_bundle()).unwrap();
    mount_secret_value(&server, SECRET_NAME, &payload).await;

    let store = SecretsStore::new();
    let config = localstack_config(&server.uri());
    let (_, published) =
        bootstrap_from_settings(&config.secrets, &store, BootstrapOptions::default())
            .await
            .unwrap();

    assert_eq!(published.provider, SecretProviderType::LocalStack);
    assert_eq!(published.secrets.database.host, "db.internal");
    assert_eq!(
        published.secrets.cloudflare.api_key.as_ref().map(|k| k.expose_secret()),
        Some("cf_dev_api_key_example_abc123")
    );
}

#[tokio::test]
async fn test_invalid_secrets_publish_nothing() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    env::remove_var("DATABASE_USER");

    let server = MockServer::start().await;
    mount_vault_secret(
        &server,
        "widget-server",
        json!({
            "DATABASE_HOST": "db.internal",
            "DATABASE_PORT": "99999",
            "DATABASE_USER": "postgres",
            "DATABASE_PASSWORD": "short",
            "DATABASE_NAME": "app_development"
        }),
    )
    .await;

    let store = SecretsStore::new();
    let err = bootstrap_from_settings(&vault_config(&server.uri()).secrets, &store, MIRROR)
        .await
        .unwrap_err();

    match &err {
        SecretsError::Validation { issues, .. } => {
            let keys: Vec<_> = issues.iter().map(|i| i.key.as_str()).collect();
            assert_eq!(keys, vec!["DATABASE_PASSWORD", "DATABASE_PORT"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(!store.is_published());
    assert!(env::var("DATABASE_USER").is_err());
}

#[tokio::test]
async fn test_load_failure_publishes_nothing() {
    let store = SecretsStore::new();
    let err = bootstrap_from_settings(
        &vault_config(UNREACHABLE).secrets,
        &store,
        BootstrapOptions::default(),
    )
    .await
    .unwrap_err();

    assert!(err.is_load());
    assert!(store.get().is_none());
}

#[tokio::test]
async fn test_unknown_provider_fails_before_any_io() {
    let config = config_from(&[("SECRET_PROVIDER", "consul"), ("VAULT_ADDR", UNREACHABLE)]);
    let store = SecretsStore::new();

    let err = bootstrap_from_settings(&config.secrets, &store, BootstrapOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_provider_init());
    assert!(err.to_string().contains("Unknown provider type: consul"));
    assert!(err.to_string().contains("'vault', 'localstack'"));
}

#[tokio::test]
async fn test_second_bootstrap_is_rejected_and_first_value_kept() {
    let server = MockServer::start().await;
    let payload = serde_json::to_string(&valid_bundle()).unwrap();
    mount_secret_value(&server, SECRET_NAME, &payload).await;

    let store = SecretsStore::new();
    let config = localstack_config(&server.uri());
    let options = BootstrapOptions::default();

    let (_, first) = bootstrap_from_settings(&config.secrets, &store, options).await.unwrap();
    let loaded_at = first.loaded_at;

    let err = bootstrap_from_settings(&config.secrets, &store, options).await.unwrap_err();
    assert!(matches!(err, SecretsError::AlreadyPublished));
    assert_eq!(store.get().unwrap().loaded_at, loaded_at);
}

#[tokio::test]
async fn test_mirror_env_copies_validated_values() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

    let server = MockServer::start().await;
    mount_vault_secret(
        &server,
        "widget-server",
        json!({
            "DATABASE_HOST": "mirror.internal",
            "DATABASE_PORT": " 6543 ",
            "DATABASE_USER": "mirror_user",
            "DATABASE_PASSWORD": "mirror_password",
            "DATABASE_NAME": "mirror_db",
            "NOT_IN_SCHEMA": "stays-out"
        }),
    )
    .await;

    let store = SecretsStore::new();
    bootstrap_from_settings(&vault_config(&server.uri()).secrets, &store, MIRROR)
        .await
        .unwrap();

    assert_eq!(env::var("DATABASE_HOST").unwrap(), "mirror.internal");
    assert_eq!(env::var("DATABASE_PORT").unwrap(), "6543");
    assert_eq!(env::var("DATABASE_PASSWORD").unwrap(), "mirror_password");
    assert!(env::var("NOT_IN_SCHEMA").is_err());

    for key in store.get().unwrap().secrets.keys() {
        env::remove_var(key);
    }
}
