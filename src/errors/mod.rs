//! # Error Handling
//!
//! Crate-level errors built with `thiserror`. Secret-specific failures live
//! in [`crate::secrets::SecretsError`] and convert into [`Error::Secrets`].

pub mod types;

pub use types::{Error, Result};
