//! # Observability Infrastructure
//!
//! Structured logging for the service and the setup tool. HTTP requests are
//! traced by `tower-http`'s `TraceLayer` using [`request_span!`](crate::request_span).

pub mod logging;

pub use logging::{init_logging, log_config_info};
