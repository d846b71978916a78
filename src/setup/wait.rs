//! Bounded fixed-delay readiness polling.

use std::future::Future;
use std::time::Duration;

use anyhow::bail;
use tracing::{info, warn};

/// How many times to check and how long to wait between checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 10, delay: Duration::from_millis(2000) }
    }
}

/// Call `check` until it reports ready or the attempts run out.
///
/// `Ok(false)` means reachable but not ready yet, `Err` means unreachable;
/// both are retried. There is no sleep after the last attempt.
pub async fn wait_until_ready<F, Fut>(
    service: &str,
    policy: &RetryPolicy,
    mut check: F,
) -> anyhow::Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, String>>,
{
    for attempt in 1..=policy.max_attempts {
        match check().await {
            Ok(true) => {
                info!(service, attempt, "{} is ready", service);
                return Ok(());
            }
            Ok(false) => {
                warn!(
                    service,
                    attempt,
                    max_attempts = policy.max_attempts,
                    "{} is not ready, waiting...",
                    service
                );
            }
            Err(error) => {
                warn!(
                    service,
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %error,
                    "Failed to reach {}, retrying...",
                    service
                );
            }
        }

        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }

    bail!("{} is not ready after {} attempts", service, policy.max_attempts)
}
