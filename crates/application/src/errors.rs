//! Application Layer Errors
//!
//! Every failure the coordinator can observe, tagged with the query or
//! document it concerns. Only `SearchFailed` is meant to reach the user;
//! the rest are recovered locally and logged.

use domain::errors::{BackendError, DomainError};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SearchError {
    /// Suggestions could not be loaded; the list is cleared, typing continues
    #[error("Suggestion fetch failed for '{query}': {source}")]
    SuggestionFetchFailed { query: String, source: BackendError },

    /// Search request failed; previous results stay visible
    #[error("Search failed for '{query}': {source}")]
    SearchFailed { query: String, source: BackendError },

    /// History write failed; never surfaced
    #[error("History update failed for '{query}': {source}")]
    HistoryUpdateFailed { query: String, source: BackendError },

    /// Related documents of the focused document could not be loaded
    #[error("Related documents unavailable for '{document_id}': {source}")]
    RelatedFetchFailed {
        document_id: String,
        source: BackendError,
    },

    #[error("Invalid input: {0}")]
    Domain(#[from] DomainError),

    /// The coordinator was torn down
    #[error("Search coordinator is closed")]
    Closed,
}

/// Application result type
pub type ApplicationResult<T> = Result<T, SearchError>;

impl SearchError {
    pub fn suggestion_fetch_failed<S: Into<String>>(query: S, source: BackendError) -> Self {
        Self::SuggestionFetchFailed {
            query: query.into(),
            source,
        }
    }

    pub fn search_failed<S: Into<String>>(query: S, source: BackendError) -> Self {
        Self::SearchFailed {
            query: query.into(),
            source,
        }
    }

    pub fn history_update_failed<S: Into<String>>(query: S, source: BackendError) -> Self {
        Self::HistoryUpdateFailed {
            query: query.into(),
            source,
        }
    }

    pub fn related_fetch_failed<S: Into<String>>(document_id: S, source: BackendError) -> Self {
        Self::RelatedFetchFailed {
            document_id: document_id.into(),
            source,
        }
    }

    /// Underlying backend failure, if any
    pub fn backend_error(&self) -> Option<&BackendError> {
        match self {
            Self::SuggestionFetchFailed { source, .. }
            | Self::SearchFailed { source, .. }
            | Self::HistoryUpdateFailed { source, .. }
            | Self::RelatedFetchFailed { source, .. } => Some(source),
            Self::Domain(_) | Self::Closed => None,
        }
    }

    /// Check if retrying the same operation later may succeed
    pub fn is_retryable(&self) -> bool {
        self.backend_error()
            .map(BackendError::is_retryable)
            .unwrap_or(false)
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::SuggestionFetchFailed { .. } => "suggestions",
            Self::SearchFailed { .. } => "search",
            Self::HistoryUpdateFailed { .. } => "history",
            Self::RelatedFetchFailed { .. } => "related",
            Self::Domain(_) => "validation",
            Self::Closed => "closed",
        }
    }
}
