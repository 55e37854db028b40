//! Documents as they appear in search results and related-document panels

use crate::{DocumentId, SimilarityScore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The subset of a stored document the search client needs to display it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: DocumentId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_view_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,
}

impl DocumentRef {
    pub fn new(id: impl Into<DocumentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: None,
            mime_type: None,
            web_view_link: None,
            last_accessed: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// One ranked hit of a search invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub document: DocumentRef,
    pub score: f32,
    #[serde(default)]
    pub highlights: Vec<String>,
    /// Ranking was boosted by the user's own history
    #[serde(default)]
    pub personalized: bool,
}

impl SearchResult {
    pub fn new(document: DocumentRef, score: f32) -> Self {
        Self {
            document,
            score,
            highlights: Vec::new(),
            personalized: false,
        }
    }

    pub fn with_highlights(mut self, highlights: Vec<String>) -> Self {
        self.highlights = highlights;
        self
    }

    pub fn personalized(mut self, personalized: bool) -> Self {
        self.personalized = personalized;
        self
    }
}

/// A document judged similar to the focused document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedDocument {
    pub document: DocumentRef,
    pub similarity_score: SimilarityScore,
}

impl RelatedDocument {
    pub fn new(document: DocumentRef, similarity_score: SimilarityScore) -> Self {
        Self {
            document,
            similarity_score,
        }
    }

    /// Similarity rendered as a whole percentage ("87% match")
    pub fn match_percent(&self) -> u32 {
        (self.similarity_score.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_percent() {
        let doc = DocumentRef::new("7", "contract.pdf");
        assert_eq!(RelatedDocument::new(doc.clone(), 0.874).match_percent(), 87);
        assert_eq!(RelatedDocument::new(doc.clone(), 1.3).match_percent(), 100);
        assert_eq!(RelatedDocument::new(doc, -0.2).match_percent(), 0);
    }

    #[test]
    fn test_search_result_builder() {
        let result = SearchResult::new(DocumentRef::new("1", "a.txt").with_category("Finance"), 0.9)
            .with_highlights(vec!["total <b>due</b>".to_string()])
            .personalized(true);
        assert!(result.personalized);
        assert_eq!(result.highlights.len(), 1);
        assert_eq!(result.document.category.as_deref(), Some("Finance"));
    }
}
