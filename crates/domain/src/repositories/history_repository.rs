//! Search history contract

use crate::entities::HistoryEntry;
use crate::errors::BackendResult;
use async_trait::async_trait;

/// Append-only search history kept by the backend
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Record a submitted query
    async fn record_history(&self, query: &str) -> BackendResult<()>;

    /// Most recent entries first
    async fn history(&self) -> BackendResult<Vec<HistoryEntry>>;
}
