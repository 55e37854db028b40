//! Domain Layer - dms-search
//!
//! Contains ONLY the document-search vocabulary, without dependencies on:
//! - Transport (HTTP clients, sessions)
//! - Runtimes (timers, task spawning)
//! - Presentation (CLI, rendering)
//!
//! Layout:
//! - Entities: suggestions, search results, related documents, history entries
//! - Value Objects: immutable concepts (`Confidence`, `SuggestionKind`)
//! - Repository Abstractions: async contracts the backend must satisfy
//! - Config: typed client configuration shared by every layer

pub mod config;
pub mod entities;
pub mod errors;
pub mod repositories;
pub mod value_objects;

// Re-export core domain types
pub use entities::{DocumentRef, HistoryEntry, RelatedDocument, SearchResult, Suggestion};
pub use errors::{BackendError, BackendResult, DomainError, DomainResult};
pub use repositories::{HistoryRepository, SearchRepository, SuggestionRepository};
pub use value_objects::{Confidence, SuggestionKind};

/// Identifier of a document as issued by the backend
pub type DocumentId = String;
/// Similarity between two documents as reported by the backend
pub type SimilarityScore = f32;
