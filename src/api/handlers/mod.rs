pub mod demo;
pub mod health;
pub mod index;

pub use demo::{
    database_status_handler, provider_comparison_handler, secrets_info_handler,
    DatabaseStatusResponse, ProviderComparisonResponse, SecretsInfoResponse,
};
pub use health::{
    health_handler, provider_health_handler, HealthResponse, ProviderHealthResponse,
};
pub use index::{index_handler, IndexResponse};
