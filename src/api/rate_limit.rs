//! Per-client request limiting.
//!
//! A token bucket per client IP, refilled evenly across the window: a client
//! may spend `max_requests` at once and then earns one request back every
//! `window / max_requests`. Requests over the limit get `429 Too Many Requests`.
//!
//! The client is identified by `SmartIpKeyExtractor`, which reads
//! `x-forwarded-for`, `x-real-ip` and `forwarded` before falling back to the
//! peer address, so the server must be run with connect info.

use std::time::Duration;

use axum::{body::Body, Router};
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::SmartIpKeyExtractor;
use tower_governor::GovernorLayer;
use tracing::{info, warn};

use crate::config::RateLimitConfig;

/// Time to earn back one request.
pub fn replenish_interval(config: &RateLimitConfig) -> Duration {
    Duration::from_secs(config.window_secs) / config.max_requests.max(1)
}

/// Wrap `router` in the limiter.
///
/// A limit too fine to express leaves the router unlimited.
pub fn apply_rate_limit(router: Router, config: &RateLimitConfig) -> Router {
    let period = replenish_interval(config);

    let Some(governor_config) = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .period(period)
        .burst_size(config.max_requests)
        .finish()
    else {
        warn!(
            max_requests = config.max_requests,
            window_secs = config.window_secs,
            "Rate limit cannot be enforced, requests are not limited"
        );
        return router;
    };

    info!(
        max_requests = config.max_requests,
        window_secs = config.window_secs,
        "Rate limiting enabled"
    );
    router.layer(GovernorLayer::<_, _, Body>::new(governor_config))
}
