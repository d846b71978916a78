use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::error::ErrorBody;
use crate::api::handlers::demo::{
    Cost, ProviderComparisonItem, ProviderFeatures, SecretExample, SetupComplexity,
};
use crate::api::handlers::{
    DatabaseStatusResponse, HealthResponse, IndexResponse, ProviderComparisonResponse,
    ProviderHealthResponse, SecretsInfoResponse,
};
use crate::secrets::SecretProviderType;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Secrets Management Demo API",
        description = "Didactic API comparing HashiCorp Vault and AWS Secrets Manager (LocalStack)"
    ),
    paths(
        crate::api::handlers::index::index_handler,
        crate::api::handlers::health::health_handler,
        crate::api::handlers::health::provider_health_handler,
        crate::api::handlers::demo::secrets_info_handler,
        crate::api::handlers::demo::database_status_handler,
        crate::api::handlers::demo::provider_comparison_handler
    ),
    components(
        schemas(
            IndexResponse,
            HealthResponse,
            ProviderHealthResponse,
            SecretsInfoResponse,
            SecretExample,
            DatabaseStatusResponse,
            ProviderComparisonResponse,
            ProviderComparisonItem,
            ProviderFeatures,
            SetupComplexity,
            Cost,
            SecretProviderType,
            ErrorBody
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Demo", description = "Secret management demonstrations"),
        (name = "Providers", description = "Provider comparisons")
    )
)]
pub struct ApiDoc;

pub fn docs_router() -> Router {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()).into()
}
