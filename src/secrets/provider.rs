//! The capability every secrets backend adapter implements.

use async_trait::async_trait;
use serde_json::Value;

use super::error::Result;
use super::types::{SecretBundle, SecretProviderType};

/// A backend that can hand over the application's secret bundle.
///
/// Implementations must be `Send + Sync`; health checks may run while
/// requests are being served.
#[async_trait]
pub trait SecretsProvider: Send + Sync + std::fmt::Debug {
    /// Fixed label of the backend variant.
    fn name(&self) -> SecretProviderType;

    /// Fetch the current bundle from the backend.
    ///
    /// Fails with [`SecretsError::Load`](super::SecretsError::Load) when the
    /// backend is unreachable, answers with malformed data, or the secret is
    /// absent. No retry happens here.
    async fn load_secrets(&self) -> Result<SecretBundle>;

    /// Best-effort check. Never fails: any error is reported as `false`.
    /// Must not write to the backend.
    async fn health_check(&self) -> bool;
}

/// Flatten a JSON object into a bundle.
///
/// Strings pass through unchanged, numbers and booleans are stringified.
/// Nulls, arrays and nested objects make the payload malformed.
pub(crate) fn bundle_from_values<I>(values: I) -> std::result::Result<SecretBundle, String>
where
    I: IntoIterator<Item = (String, Value)>,
{
    values
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(s) => Ok((key, s)),
            Value::Number(n) => Ok((key, n.to_string())),
            Value::Bool(b) => Ok((key, b.to_string())),
            other => Err(format!("value for '{}' is not a scalar: {}", key, kind_of(&other))),
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        _ => "scalar",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Vec<(String, Value)> {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_strings_pass_through_unchanged() {
        let bundle = bundle_from_values(object(json!({
            "DATABASE_HOST": "localhost",
            "DATABASE_PASSWORD": "  spaced  ",
        })))
        .unwrap();

        assert_eq!(bundle["DATABASE_HOST"], "localhost");
        assert_eq!(bundle["DATABASE_PASSWORD"], "  spaced  ");
    }

    #[test]
    fn test_scalars_are_stringified() {
        let bundle =
            bundle_from_values(object(json!({"DATABASE_PORT": 5432, "FLAG": true}))).unwrap();

        assert_eq!(bundle["DATABASE_PORT"], "5432");
        assert_eq!(bundle["FLAG"], "true");
    }

    #[test]
    fn test_nested_values_are_rejected() {
        let err = bundle_from_values(object(json!({"DATABASE": {"host": "localhost"}})))
            .unwrap_err();
        assert!(err.contains("DATABASE"));
        assert!(err.contains("object"));

        assert!(bundle_from_values(object(json!({"KEY": null}))).is_err());
    }
}
