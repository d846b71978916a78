//! # Backend Seeding
//!
//! Development helpers behind the `secrets-setup` binary. Each one waits for
//! its backend with a bounded fixed-delay poll, writes the sample secret set
//! to the location the service reads, then reads it back.
//!
//! Both run against the same configuration keys as the service.

pub mod localstack;
pub mod vault;
pub mod wait;

pub use localstack::setup_localstack;
pub use vault::setup_vault;
pub use wait::{wait_until_ready, RetryPolicy};

use crate::secrets::SecretBundle;

/// Development secret set written by both setup commands.
pub const SAMPLE_SECRETS: [(&str, &str); 7] = [
    ("DATABASE_HOST", "localhost"),
    ("DATABASE_PORT", "5432"),
    ("DATABASE_USER", "postgres"),
    ("DATABASE_PASSWORD", "dev_password_123"),
    ("DATABASE_NAME", "app_development"),
    ("CLOUDFLARE_API_KEY", "cf_dev_api_key_example_abc123"),
    ("NEW_RELIC_LICENSE_KEY", "nr_dev_license_key_example_xyz789"),
];

pub fn sample_bundle() -> SecretBundle {
    SAMPLE_SECRETS.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Sample keys absent from `bundle`.
pub fn missing_keys(bundle: &SecretBundle) -> Vec<&'static str> {
    SAMPLE_SECRETS.iter().map(|(key, _)| *key).filter(|key| !bundle.contains_key(*key)).collect()
}
