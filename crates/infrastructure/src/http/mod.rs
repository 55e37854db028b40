//! HTTP adapter for the document-management backend

mod client;
pub(crate) mod wire;

pub use client::{HealthStatus, HttpSearchBackend};
