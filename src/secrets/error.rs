//! Error types for loading and validating secrets.

use thiserror::Error;

use super::types::SecretProviderType;
use super::validation::FieldIssue;

/// Result type for secrets operations.
pub type Result<T> = std::result::Result<T, SecretsError>;

/// Boxed underlying cause carried by provider errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while resolving a provider, loading its bundle or
/// validating the result.
///
/// All three kinds are fatal during startup. Only `health_check` swallows
/// load-style failures, and it reports them as `false`.
#[derive(Error, Debug)]
pub enum SecretsError {
    /// The provider could not be constructed from configuration, or the
    /// requested provider type is unknown.
    #[error("[{provider}] {message}")]
    ProviderInit {
        provider: String,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The backend was reachable but failed, answered with malformed data,
    /// or the expected secret object is absent.
    #[error("[{provider}] {message}")]
    Load {
        provider: SecretProviderType,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The loaded bundle does not satisfy the secret schema.
    #[error("Secret validation failed: {message}")]
    Validation { message: String, issues: Vec<FieldIssue> },

    /// Secrets were already published for this store.
    #[error("Secrets have already been published")]
    AlreadyPublished,
}

impl SecretsError {
    /// Create a provider initialization error.
    pub fn provider_init(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderInit { provider: provider.into(), message: message.into(), source: None }
    }

    /// Create a provider initialization error that keeps its cause.
    pub fn provider_init_with_source(
        provider: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::ProviderInit {
            provider: provider.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a load error.
    pub fn load(provider: SecretProviderType, message: impl Into<String>) -> Self {
        Self::Load { provider, message: message.into(), source: None }
    }

    /// Create a load error that keeps its cause.
    pub fn load_with_source(
        provider: SecretProviderType,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Load { provider, message: message.into(), source: Some(source.into()) }
    }

    /// Create a validation error from the collected field issues.
    pub fn validation(issues: Vec<FieldIssue>) -> Self {
        let message =
            issues.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        Self::Validation { message, issues }
    }

    pub fn is_provider_init(&self) -> bool {
        matches!(self, Self::ProviderInit { .. })
    }

    pub fn is_load(&self) -> bool {
        matches!(self, Self::Load { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_provider_errors_are_prefixed_with_provider() {
        let err = SecretsError::provider_init("consul", "Unknown provider type: consul");
        assert!(err.is_provider_init());
        assert_eq!(err.to_string(), "[consul] Unknown provider type: consul");

        let err = SecretsError::load(SecretProviderType::Vault, "Failed to read secrets");
        assert!(err.is_load());
        assert_eq!(err.to_string(), "[vault] Failed to read secrets");
    }

    #[test]
    fn test_load_error_preserves_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = SecretsError::load_with_source(
            SecretProviderType::LocalStack,
            "Failed to retrieve secret '/widget-server/secrets'",
            cause,
        );

        let source = err.source().expect("cause should be kept");
        assert_eq!(source.to_string(), "refused");
    }

    #[test]
    fn test_validation_error_joins_issues() {
        let err = SecretsError::validation(vec![
            FieldIssue::new("DATABASE_HOST", "is required"),
            FieldIssue::new("DATABASE_PASSWORD", "must be at least 8 characters"),
        ]);

        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Secret validation failed: DATABASE_HOST: is required, \
             DATABASE_PASSWORD: must be at least 8 characters"
        );
    }
}
