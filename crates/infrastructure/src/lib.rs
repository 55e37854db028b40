//! Infrastructure Layer
//!
//! Adapters behind the domain ports: configuration loading and validation,
//! the explicit auth `Session`, and the reqwest-based search backend.

pub mod config;
pub mod http;
pub mod session;

pub use config::{ConfigLoader, ConfigSource, ConfigValidator};
pub use http::{HealthStatus, HttpSearchBackend};
pub use session::Session;
