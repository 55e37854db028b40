//! Suggestion - a candidate completion shown while the user types

use crate::errors::{DomainError, DomainResult};
use crate::value_objects::{Confidence, SuggestionKind};
use crate::DocumentId;
use serde::{Deserialize, Serialize};

/// Candidate completion or related term for the current query
///
/// Suggestions are ephemeral: regenerated on every fetch and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub kind: SuggestionKind,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_document_id: Option<DocumentId>,
}

impl Suggestion {
    pub fn new(text: impl Into<String>, kind: SuggestionKind, confidence: Confidence) -> Self {
        Self {
            text: text.into(),
            kind,
            confidence,
            related_document_id: None,
        }
    }

    /// Term suggestion with full confidence
    pub fn term(text: impl Into<String>) -> Self {
        Self::new(text, SuggestionKind::Term, Confidence::CERTAIN)
    }

    /// Caller-supplied suggestion; selecting it notifies the caller
    pub fn external(text: impl Into<String>) -> Self {
        Self::new(text, SuggestionKind::External, Confidence::CERTAIN)
    }

    /// Suggestion pointing at a document whose related panel should open on selection
    pub fn document(
        text: impl Into<String>,
        confidence: Confidence,
        document_id: impl Into<DocumentId>,
    ) -> Self {
        Self::new(text, SuggestionKind::Document, confidence).with_related_document(document_id)
    }

    pub fn with_related_document(mut self, document_id: impl Into<DocumentId>) -> Self {
        self.related_document_id = Some(document_id.into());
        self
    }

    /// Key that must be unique within a displayed list: `kind + text`
    pub fn display_key(&self) -> (SuggestionKind, &str) {
        (self.kind, self.text.as_str())
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.text.trim().is_empty() {
            return Err(DomainError::EmptySuggestionText);
        }
        if let Some(id) = &self.related_document_id {
            if id.trim().is_empty() {
                return Err(DomainError::EmptyDocumentId);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let term = Suggestion::term("invoice");
        assert_eq!(term.kind, SuggestionKind::Term);
        assert_eq!(term.confidence.value(), 1.0);
        assert!(term.related_document_id.is_none());

        let doc = Suggestion::document("Q3 report", Confidence::clamped(0.7), "42");
        assert_eq!(doc.kind, SuggestionKind::Document);
        assert_eq!(doc.related_document_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_display_key_distinguishes_kind() {
        let a = Suggestion::term("tax");
        let b = Suggestion::new("tax", SuggestionKind::Category, Confidence::CERTAIN);
        assert_ne!(a.display_key(), b.display_key());
        assert_eq!(a.display_key(), Suggestion::term("tax").display_key());
    }

    #[test]
    fn test_validate() {
        assert!(Suggestion::term("ok").validate().is_ok());
        assert_eq!(
            Suggestion::term("  ").validate(),
            Err(DomainError::EmptySuggestionText)
        );
        assert_eq!(
            Suggestion::term("x").with_related_document("").validate(),
            Err(DomainError::EmptyDocumentId)
        );
    }
}
