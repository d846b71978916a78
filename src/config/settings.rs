//! # Configuration Settings
//!
//! Defines the configuration structure for the service and the setup tool.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{Error, Result};
use crate::secrets::{LocalStackProviderConfig, SecretString, VaultProviderConfig};

/// Deployment environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(Error::validation_field(
                format!(
                    "Unknown environment '{}': expected development, production or test",
                    other
                ),
                "APP_ENV",
            )),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main application configuration
#[derive(Debug, Clone, Validate)]
pub struct AppConfig {
    pub environment: Environment,

    /// HTTP server configuration
    #[validate(nested)]
    pub server: ServerConfig,

    /// Secrets backend configuration
    #[validate(nested)]
    pub secrets: SecretsSettings,

    /// Logging configuration
    #[validate(nested)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Server bind address
    #[validate(length(min = 1, message = "Host cannot be empty"))]
    pub host: String,

    /// Server port
    #[validate(range(min = 1, max = 65535, message = "Port must be between 1 and 65535"))]
    pub port: u16,

    /// Per-client request limit
    #[validate(nested)]
    pub rate_limit: RateLimitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 3000, rate_limit: RateLimitConfig::default() }
    }
}

/// Per-client request limit: at most `max_requests` in any `window_secs`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RateLimitConfig {
    #[validate(range(min = 1, message = "RATE_LIMIT_MAX must be at least 1"))]
    pub max_requests: u32,

    #[validate(range(min = 1, message = "RATE_LIMIT_WINDOW_SECS must be at least 1"))]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // 100 requests per 15 minutes
        Self { max_requests: 100, window_secs: 900 }
    }
}

impl ServerConfig {
    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Secrets backend selection plus the settings of both adapters.
///
/// Only the section named by `provider` is used by the service. The setup
/// tool reads the same values so it seeds the location the service reads.
#[derive(Debug, Clone, Validate)]
pub struct SecretsSettings {
    /// Provider token; checked by the provider factory
    #[validate(length(min = 1, message = "SECRET_PROVIDER cannot be empty"))]
    pub provider: String,

    #[validate(nested)]
    pub vault: VaultProviderConfig,

    #[validate(nested)]
    pub localstack: LocalStackProviderConfig,

    /// Emulator base URL, used by the setup tool even when the adapter talks
    /// to the real service
    #[validate(url(message = "LOCALSTACK_ENDPOINT must be a valid URL"))]
    pub localstack_endpoint: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl LoggingConfig {
    pub fn for_environment(environment: Environment) -> Self {
        if environment.is_production() {
            Self { level: "info".to_string(), json: true }
        } else {
            Self { level: "debug".to_string(), json: false }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// unset keys, then validate it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let environment = match lookup("APP_ENV").or_else(|| lookup("NODE_ENV")) {
            Some(value) => value.parse()?,
            None => Environment::default(),
        };

        let number = |key: &str, default: &str| parse_number(&get(key, default), key);

        let port: u16 = number("PORT", "3000")?;
        let rate_limit = RateLimitConfig {
            max_requests: parse_number(&get("RATE_LIMIT_MAX", "100"), "RATE_LIMIT_MAX")?,
            window_secs: parse_number(
                &get("RATE_LIMIT_WINDOW_SECS", "900"),
                "RATE_LIMIT_WINDOW_SECS",
            )?,
        };

        let use_localstack = lookup("USE_LOCALSTACK").as_deref() == Some("true");
        let localstack_endpoint = get("LOCALSTACK_ENDPOINT", "http://localhost:4566");

        let mut logging = LoggingConfig::for_environment(environment);
        if let Some(level) = lookup("RUST_LOG") {
            logging.level = level;
        }

        let config = Self {
            environment,
            server: ServerConfig { host: get("HOST", "0.0.0.0"), port, rate_limit },
            secrets: SecretsSettings {
                provider: get("SECRET_PROVIDER", "vault"),
                vault: VaultProviderConfig {
                    endpoint: get("VAULT_ADDR", "http://localhost:8200"),
                    token: SecretString::new(get("VAULT_TOKEN", "root")),
                    secret_path: get("VAULT_SECRET_PATH", "secret/data/widget-server"),
                },
                localstack: LocalStackProviderConfig {
                    region: get("AWS_REGION", "us-east-1"),
                    access_key_id: get("AWS_ACCESS_KEY_ID", "test"),
                    secret_access_key: SecretString::new(get("AWS_SECRET_ACCESS_KEY", "test")),
                    secret_name: get("AWS_SECRET_NAME", "/widget-server/secrets"),
                    endpoint: use_localstack.then(|| localstack_endpoint.clone()),
                    use_localstack,
                },
                localstack_endpoint,
            },
            logging,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)
    }
}

fn parse_number<T>(value: &str, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| Error::validation_field(format!("Invalid {}: {}", key, e), key))
}
