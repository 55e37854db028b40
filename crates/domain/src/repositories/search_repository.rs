//! Search and suggestion contracts
//!
//! Ranking, similarity and suggestion generation all happen server-side;
//! these traits only describe the calls the client makes.

use crate::entities::{RelatedDocument, SearchResult, Suggestion};
use crate::errors::BackendResult;
use async_trait::async_trait;

/// Source of suggestions for a partially typed query
#[async_trait]
pub trait SuggestionRepository: Send + Sync {
    /// Fetch suggestions for `query`; ordering is the backend's ranking
    async fn fetch_suggestions(&self, query: &str) -> BackendResult<Vec<Suggestion>>;
}

/// Full-text / semantic search over stored documents
#[async_trait]
pub trait SearchRepository: Send + Sync {
    /// Execute a search; results arrive ranked, best first
    async fn search(&self, query: &str) -> BackendResult<Vec<SearchResult>>;

    /// Documents similar to `document_id`, best first
    async fn related_documents(&self, document_id: &str) -> BackendResult<Vec<RelatedDocument>>;
}
