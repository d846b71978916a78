//! Common test utilities for all integration tests.
//!
//! Wiremock stand-ins for the Vault HTTP API and the Secrets Manager JSON
//! protocol, plus configuration helpers pointed at them.

#![allow(dead_code)]
#![allow(clippy::duplicate_mod)]

use std::collections::HashMap;

use secrets_demo::config::AppConfig;
use secrets_demo::secrets::SecretBundle;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const VAULT_TOKEN: &str = "test-root-token";
pub const SECRET_NAME: &str = "/widget-server/secrets";
pub const AMZ_JSON: &str = "application/x-amz-json-1.1";

/// Nothing listens on port 1, so connections are refused immediately.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

pub fn bundle(pairs: &[(&str, &str)]) -> SecretBundle {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

pub fn valid_bundle() -> SecretBundle {
    bundle(&[
        ("DATABASE_HOST", "db.internal"),
        ("DATABASE_PORT", "5432"),
        ("DATABASE_USER", "postgres"),
        ("DATABASE_PASSWORD", "dev_password_123"),
        ("DATABASE_NAME", "app_development"),
        ("CLOUDFLARE_API_KEY", "cf_dev_api_key_example_abc123"),
    ])
}

/// Build an [`AppConfig`] from explicit key/value pairs only.
pub fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
    let vars: HashMap<String, String> =
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("test config is valid")
}

pub fn vault_config(endpoint: &str) -> AppConfig {
    config_from(&[
        ("SECRET_PROVIDER", "vault"),
        ("VAULT_ADDR", endpoint),
        ("VAULT_TOKEN", VAULT_TOKEN),
        ("VAULT_SECRET_PATH", "secret/data/widget-server"),
    ])
}

pub fn localstack_config(endpoint: &str) -> AppConfig {
    config_from(&[
        ("SECRET_PROVIDER", "localstack"),
        ("USE_LOCALSTACK", "true"),
        ("LOCALSTACK_ENDPOINT", endpoint),
        ("AWS_SECRET_NAME", SECRET_NAME),
    ])
}

// ---------------------------------------------------------------------------
// Vault
// ---------------------------------------------------------------------------

/// Body of a KV v2 read, as returned by `GET /v1/<mount>/data/<path>`.
pub fn vault_kv2_body(data: Value) -> Value {
    json!({
        "request_id": "5c8b3a0e-6a4c-4c43-9b0a-3f1f8b0c0d11",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "data": {
            "data": data,
            "metadata": {
                "created_time": "2024-01-01T00:00:00.000000Z",
                "custom_metadata": null,
                "deletion_time": "",
                "destroyed": false,
                "version": 1
            }
        },
        "wrap_info": null,
        "warnings": null,
        "auth": null
    })
}

/// Body of `GET /v1/sys/health`.
///
/// The fields are repeated under `data` so the body parses whether or not the
/// client unwraps a response envelope.
pub fn vault_health_body(initialized: bool, sealed: bool) -> Value {
    let fields = json!({
        "cluster_id": "c9abceea-4f46-4dab-a688-5ce55f89e228",
        "cluster_name": "vault-cluster-5515c810",
        "initialized": initialized,
        "performance_standby": false,
        "replication_dr_mode": "disabled",
        "replication_performance_mode": "disabled",
        "sealed": sealed,
        "server_time_utc": 1_700_000_000u64,
        "standby": false,
        "version": "1.15.2"
    });
    let mut body = fields.clone();
    body["data"] = fields;
    body
}

pub async fn mount_vault_secret(server: &MockServer, secret_path: &str, data: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/secret/data/{}", secret_path)))
        .and(header("X-Vault-Token", VAULT_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(vault_kv2_body(data)))
        .mount(server)
        .await;
}

pub async fn mount_vault_health(server: &MockServer, initialized: bool, sealed: bool) {
    Mock::given(method("GET"))
        .and(path("/v1/sys/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(vault_health_body(initialized, sealed)),
        )
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Secrets Manager
// ---------------------------------------------------------------------------

pub fn amz_json(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", AMZ_JSON)
        .set_body_string(body.to_string())
}

pub fn amz_not_found(secret_name: &str) -> ResponseTemplate {
    ResponseTemplate::new(400)
        .insert_header("content-type", AMZ_JSON)
        .insert_header("x-amzn-errortype", "ResourceNotFoundException")
        .set_body_string(
            json!({
                "__type": "ResourceNotFoundException",
                "message":
                    format!("Secrets Manager can't find the specified secret: {}", secret_name)
            })
            .to_string(),
        )
}

pub fn get_secret_value_body(secret_name: &str, secret_string: &str) -> Value {
    json!({
        "ARN": format!(
            "arn:aws:secretsmanager:us-east-1:000000000000:secret:{}-AbCdEf",
            secret_name
        ),
        "Name": secret_name,
        "VersionId": "6f1e8b3c-2d4a-4b5c-9e7f-0a1b2c3d4e5f",
        "SecretString": secret_string,
        "VersionStages": ["AWSCURRENT"],
        "CreatedDate": 1_700_000_000.0
    })
}

/// Mock for one Secrets Manager operation, matched on its `X-Amz-Target`.
pub fn amz_operation(operation: &str) -> wiremock::MockBuilder {
    Mock::given(method("POST")).and(header("x-amz-target", format!("secretsmanager.{}", operation)))
}

pub async fn mount_secret_value(server: &MockServer, secret_name: &str, secret_string: &str) {
    amz_operation("GetSecretValue")
        .respond_with(amz_json(get_secret_value_body(secret_name, secret_string)))
        .mount(server)
        .await;
}
