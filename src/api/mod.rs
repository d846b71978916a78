//! # REST API Components
//!
//! HTTP routing, handlers and OpenAPI docs. The router is only built once
//! secrets have been published, so every handler can rely on them.

pub mod docs;
pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod server;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::ApiError;
pub use routes::{build_router, ApiState};
pub use server::start_api_server;
