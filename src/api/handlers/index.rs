use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::routes::ApiState;
use crate::secrets::SecretProviderType;

/// Entry point listing where to go next
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IndexResponse {
    #[schema(example = "Secrets Management Demo API")]
    pub message: String,
    #[schema(example = "/docs")]
    pub documentation: String,
    #[schema(example = "/health")]
    pub health: String,
    pub provider: SecretProviderType,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Service entry point", body = IndexResponse)
    )
)]
pub async fn index_handler(State(state): State<ApiState>) -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Secrets Management Demo API".to_string(),
        documentation: "/docs".to_string(),
        health: "/health".to_string(),
        provider: state.published.provider,
    })
}
