//! # Secret Schema Validation
//!
//! Turns a raw [`SecretBundle`] into [`ValidatedSecrets`]. Every rule is
//! checked before anything is reported, so a single error lists every bad
//! field.

use std::fmt;

use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use super::error::{Result, SecretsError};
use super::types::{SecretBundle, SecretString};

/// One violated schema rule, keyed by the secret name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct FieldIssue {
    pub key: String,
    pub reason: String,
}

impl FieldIssue {
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { key: key.into(), reason: reason.into() }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.reason)
    }
}

/// Bundle fields as the schema sees them. Field names are the lowercase
/// form of the secret keys.
#[derive(Debug, Default, Validate)]
struct RawSecrets {
    #[validate(
        required(message = "is required"),
        length(min = 1, message = "must not be empty")
    )]
    database_host: Option<String>,

    #[validate(required(message = "is required"), custom(function = "validate_port"))]
    database_port: Option<String>,

    #[validate(
        required(message = "is required"),
        length(min = 1, message = "must not be empty")
    )]
    database_user: Option<String>,

    #[validate(
        required(message = "is required"),
        length(min = 8, message = "must be at least 8 characters")
    )]
    database_password: Option<String>,

    #[validate(
        required(message = "is required"),
        length(min = 1, message = "must not be empty")
    )]
    database_name: Option<String>,

    cloudflare_api_key: Option<String>,
    cloudflare_access_key_id: Option<String>,
    cloudflare_secret_access_key: Option<String>,
    cloudflare_bucket_name: Option<String>,
    cloudflare_account_id: Option<String>,

    #[validate(url(message = "must be a valid URL"))]
    cloudflare_endpoint: Option<String>,

    new_relic_license_key: Option<String>,
    new_relic_app_name: Option<String>,
}

fn validate_port(port: &str) -> std::result::Result<(), ValidationError> {
    match port.trim().parse::<u16>() {
        Ok(p) if p >= 1 => Ok(()),
        _ => {
            let mut err = ValidationError::new("invalid_port");
            err.message = Some("must be an integer between 1 and 65535".into());
            Err(err)
        }
    }
}

impl RawSecrets {
    fn from_bundle(bundle: &SecretBundle) -> Self {
        let get = |key: &str| bundle.get(key).cloned();
        Self {
            database_host: get("DATABASE_HOST"),
            database_port: get("DATABASE_PORT"),
            database_user: get("DATABASE_USER"),
            database_password: get("DATABASE_PASSWORD"),
            database_name: get("DATABASE_NAME"),
            cloudflare_api_key: get("CLOUDFLARE_API_KEY"),
            cloudflare_access_key_id: get("CLOUDFLARE_ACCESS_KEY_ID"),
            cloudflare_secret_access_key: get("CLOUDFLARE_SECRET_ACCESS_KEY"),
            cloudflare_bucket_name: get("CLOUDFLARE_BUCKET_NAME"),
            cloudflare_account_id: get("CLOUDFLARE_ACCOUNT_ID"),
            cloudflare_endpoint: get("CLOUDFLARE_ENDPOINT"),
            new_relic_license_key: get("NEW_RELIC_LICENSE_KEY"),
            new_relic_app_name: get("NEW_RELIC_APP_NAME"),
        }
    }

    /// Only called after `validate` succeeded; `None` means a required field
    /// slipped through.
    fn into_validated(self) -> Option<ValidatedSecrets> {
        Some(ValidatedSecrets {
            database: DatabaseSecrets {
                host: self.database_host?,
                port: self.database_port?.trim().parse().ok()?,
                user: self.database_user?,
                password: SecretString::from(self.database_password?),
                name: self.database_name?,
            },
            cloudflare: CloudflareSecrets {
                api_key: self.cloudflare_api_key.map(SecretString::from),
                access_key_id: self.cloudflare_access_key_id,
                secret_access_key: self.cloudflare_secret_access_key.map(SecretString::from),
                bucket_name: self.cloudflare_bucket_name,
                account_id: self.cloudflare_account_id,
                endpoint: self.cloudflare_endpoint,
            },
            new_relic: NewRelicSecrets {
                license_key: self.new_relic_license_key.map(SecretString::from),
                app_name: self.new_relic_app_name,
            },
        })
    }
}

fn collect_issues(errors: &ValidationErrors) -> Vec<FieldIssue> {
    let mut issues: Vec<FieldIssue> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let key = field.to_uppercase();
            errs.iter().map(move |e| {
                let reason =
                    e.message.as_ref().map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string());
                FieldIssue::new(key.clone(), reason)
            })
        })
        .collect();
    issues.sort();
    issues
}

/// Database connection secrets. All fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseSecrets {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub name: String,
}

/// Optional object-storage credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CloudflareSecrets {
    pub api_key: Option<SecretString>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<SecretString>,
    pub bucket_name: Option<String>,
    pub account_id: Option<String>,
    pub endpoint: Option<String>,
}

/// Optional APM credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewRelicSecrets {
    pub license_key: Option<SecretString>,
    pub app_name: Option<String>,
}

/// Schema-checked secret record. Holding one means every required field is
/// present and well formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedSecrets {
    pub database: DatabaseSecrets,
    pub cloudflare: CloudflareSecrets,
    pub new_relic: NewRelicSecrets,
}

impl ValidatedSecrets {
    /// Every present value under its original key, secrets exposed.
    ///
    /// Order follows the schema, database fields first.
    pub fn exposed_entries(&self) -> Vec<(&'static str, String)> {
        let db = &self.database;
        let cf = &self.cloudflare;
        let nr = &self.new_relic;

        let mut entries = vec![
            ("DATABASE_HOST", db.host.clone()),
            ("DATABASE_PORT", db.port.to_string()),
            ("DATABASE_USER", db.user.clone()),
            ("DATABASE_PASSWORD", db.password.expose_secret().to_string()),
            ("DATABASE_NAME", db.name.clone()),
        ];

        let optional = [
            ("CLOUDFLARE_API_KEY", cf.api_key.as_ref().map(|s| s.expose_secret())),
            ("CLOUDFLARE_ACCESS_KEY_ID", cf.access_key_id.as_deref()),
            (
                "CLOUDFLARE_SECRET_ACCESS_KEY",
                cf.secret_access_key.as_ref().map(|s| s.expose_secret()),
            ),
            ("CLOUDFLARE_BUCKET_NAME", cf.bucket_name.as_deref()),
            ("CLOUDFLARE_ACCOUNT_ID", cf.account_id.as_deref()),
            ("CLOUDFLARE_ENDPOINT", cf.endpoint.as_deref()),
            ("NEW_RELIC_LICENSE_KEY", nr.license_key.as_ref().map(|s| s.expose_secret())),
            ("NEW_RELIC_APP_NAME", nr.app_name.as_deref()),
        ];
        entries.extend(
            optional.into_iter().filter_map(|(key, value)| value.map(|v| (key, v.to_string()))),
        );

        entries
    }

    /// Names of the keys that hold a value.
    pub fn keys(&self) -> Vec<&'static str> {
        self.exposed_entries().into_iter().map(|(key, _)| key).collect()
    }

    pub fn len(&self) -> usize {
        self.exposed_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validate a raw bundle against the secret schema.
///
/// Unknown keys are ignored. On failure every violated field is reported,
/// ordered by key.
pub fn validate_secrets(bundle: &SecretBundle) -> Result<ValidatedSecrets> {
    let raw = RawSecrets::from_bundle(bundle);

    if let Err(errors) = raw.validate() {
        return Err(SecretsError::validation(collect_issues(&errors)));
    }

    raw.into_validated().ok_or_else(|| {
        SecretsError::validation(vec![FieldIssue::new("DATABASE_PORT", "could not be parsed")])
    })
}
