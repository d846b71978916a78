use std::sync::Arc;
use std::time::Instant;

use axum::{
    http::{header, HeaderValue, Method, Request, Uri},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use super::{
    docs,
    error::ApiError,
    handlers::{
        database_status_handler, health_handler, index_handler, provider_comparison_handler,
        provider_health_handler, secrets_info_handler,
    },
    rate_limit::apply_rate_limit,
};
use crate::config::{Environment, RateLimitConfig};
use crate::secrets::{PublishedSecrets, SecretsProvider};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct ApiState {
    pub published: PublishedSecrets,
    pub provider: Arc<dyn SecretsProvider>,
    pub environment: Environment,
    pub started_at: Instant,
    /// Unlimited when `None`
    pub rate_limit: Option<RateLimitConfig>,
}

impl ApiState {
    pub fn new(
        published: PublishedSecrets,
        provider: Arc<dyn SecretsProvider>,
        environment: Environment,
    ) -> Self {
        Self { published, provider, environment, started_at: Instant::now(), rate_limit: None }
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }
}

impl std::fmt::Debug for ApiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiState")
            .field("provider", &self.provider.name())
            .field("environment", &self.environment)
            .field("loaded_at", &self.published.loaded_at)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

/// Inline script and style are allowed for the Swagger UI page.
const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; script-src 'self' 'unsafe-inline'; \
    style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; connect-src 'self'; \
    font-src 'self'; object-src 'none'; media-src 'self'; frame-src 'none'";

fn cors_layer(environment: Environment) -> CorsLayer {
    if environment.is_production() {
        // No CORS headers at all
        CorsLayer::new()
    } else {
        // Mirrors the request origin and allows credentials
        CorsLayer::very_permissive()
    }
}

async fn not_found_handler(method: Method, uri: Uri) -> ApiError {
    ApiError::not_found(format!("Route {} {} not found", method, uri.path()))
}

pub fn build_router(state: ApiState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            crate::request_span!(request.method(), request.uri().path())
        });

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains; preload"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ));

    let cors = cors_layer(state.environment);
    let rate_limit = state.rate_limit.clone();

    let api = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/health/provider", get(provider_health_handler))
        .route("/demo/secrets-info", get(secrets_info_handler))
        .route("/demo/database-status", get(database_status_handler))
        .route("/demo/provider-comparison", get(provider_comparison_handler))
        .with_state(state);

    let router = api.merge(docs::docs_router()).fallback(not_found_handler);
    let router = match &rate_limit {
        Some(limit) => apply_rate_limit(router, limit),
        None => router,
    };

    router
        .layer(security_headers)
        .layer(cors)
        .layer(trace_layer)
}
