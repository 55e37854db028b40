//! SuggestionKind - where a suggestion came from and what selecting it means

use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sources of suggestions shown while typing
///
/// - Category: a document category known to the backend
/// - Term: a query completion (from history or caller-supplied)
/// - Document: a specific document, usually carrying a related document id
/// - External: supplied by the embedding application; selecting it notifies the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Category,
    #[default]
    Term,
    Document,
    External,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Category => "category",
            SuggestionKind::Term => "term",
            SuggestionKind::Document => "document",
            SuggestionKind::External => "external",
        }
    }

    /// Whether the backend is allowed to produce this kind
    pub fn is_remote(&self) -> bool {
        !matches!(self, SuggestionKind::External)
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuggestionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "category" => Ok(SuggestionKind::Category),
            "term" => Ok(SuggestionKind::Term),
            "document" => Ok(SuggestionKind::Document),
            "external" => Ok(SuggestionKind::External),
            other => Err(DomainError::InvalidSuggestionKind(other.to_string())),
        }
    }
}
