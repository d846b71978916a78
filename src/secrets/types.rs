//! Shared secret types: provider identifiers, raw bundles and a redacting
//! string wrapper.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Raw key/value map exactly as a backend returned it, before validation.
pub type SecretBundle = BTreeMap<String, String>;

/// Backend variant behind a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SecretProviderType {
    /// HashiCorp Vault, KV v2 engine
    Vault,
    /// AWS Secrets Manager, usually the LocalStack emulator
    LocalStack,
}

impl SecretProviderType {
    /// Every provider type the factory knows how to build.
    pub const ALL: [SecretProviderType; 2] = [Self::Vault, Self::LocalStack];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vault => "vault",
            Self::LocalStack => "localstack",
        }
    }

    /// The accepted tokens, quoted and comma separated.
    pub fn valid_options() -> String {
        Self::ALL.iter().map(|t| format!("'{}'", t.as_str())).collect::<Vec<_>>().join(", ")
    }
}

impl FromStr for SecretProviderType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "vault" => Ok(Self::Vault),
            "localstack" => Ok(Self::LocalStack),
            _ => Err(format!("Unknown provider type: {}", s)),
        }
    }
}

impl fmt::Display for SecretProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that never shows its value in `Debug`, `Display` or
/// serialized output, and is zeroed when dropped.
///
/// Use [`SecretString::expose_secret`] where the raw value is needed.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str("[REDACTED]")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
