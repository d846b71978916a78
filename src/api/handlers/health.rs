//! Health check endpoints for monitoring and readiness checks

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::{ApiError, ErrorBody};
use crate::api::routes::ApiState;
use crate::secrets::SecretProviderType;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `healthy` when secrets are loaded, otherwise `unhealthy`
    #[schema(example = "healthy")]
    pub status: String,
    /// RFC 3339 time of the check
    pub timestamp: String,
    /// Server uptime in seconds
    pub uptime: f64,
    /// Current secret provider
    pub provider: SecretProviderType,
    /// Whether secrets were loaded successfully
    pub secrets_loaded: bool,
    #[schema(example = "0.1.0")]
    pub version: String,
}

/// Provider reachability response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProviderHealthResponse {
    pub provider: SecretProviderType,
    pub healthy: bool,
}

/// Application health check
///
/// Reports whether the published secret set holds any keys. Does not
/// contact the backend.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    )
)]
pub async fn health_handler(State(state): State<ApiState>) -> Json<HealthResponse> {
    let secrets_loaded = !state.published.secrets.is_empty();

    Json(HealthResponse {
        status: if secrets_loaded { "healthy" } else { "unhealthy" }.to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.started_at.elapsed().as_secs_f64(),
        provider: state.published.provider,
        secrets_loaded,
        version: crate::VERSION.to_string(),
    })
}

/// Secret backend health check
///
/// Runs the active provider's read-only health check.
#[utoipa::path(
    get,
    path = "/health/provider",
    tag = "Health",
    responses(
        (status = 200, description = "Backend reachable", body = ProviderHealthResponse),
        (status = 503, description = "Backend unreachable", body = ErrorBody)
    )
)]
pub async fn provider_health_handler(
    State(state): State<ApiState>,
) -> Result<Json<ProviderHealthResponse>, ApiError> {
    let provider = state.provider.name();
    if !state.provider.health_check().await {
        return Err(ApiError::service_unavailable(format!(
            "[{}] backend health check failed",
            provider
        )));
    }

    Ok(Json(ProviderHealthResponse { provider, healthy: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_utils::{test_state, FakeProvider};

    #[tokio::test]
    async fn test_health_handler_reports_loaded_secrets() {
        let Json(response) = health_handler(State(test_state(FakeProvider::healthy()))).await;

        assert_eq!(response.status, "healthy");
        assert!(response.secrets_loaded);
        assert_eq!(response.provider, SecretProviderType::Vault);
        assert_eq!(response.version, crate::VERSION);
        assert!(chrono::DateTime::parse_from_rfc3339(&response.timestamp).is_ok());
    }

    #[tokio::test]
    async fn test_provider_health_handler() {
        let Json(body) =
            provider_health_handler(State(test_state(FakeProvider::healthy()))).await.unwrap();
        assert!(body.healthy);
        assert_eq!(body.provider, SecretProviderType::Vault);

        let err = provider_health_handler(State(test_state(FakeProvider::unhealthy())))
            .await
            .unwrap_err();
        match err {
            ApiError::ServiceUnavailable(message) => assert!(message.starts_with("[vault]")),
            other => panic!("expected service unavailable, got {:?}", other),
        }
    }
}
