//! JSON shapes produced by the document-management backend and their
//! conversion into domain types. Decoding is lenient: optional fields may be
//! missing, ids may be numbers or strings, and suggestions may be plain
//! strings.

use chrono::{DateTime, NaiveDateTime, Utc};
use domain::{
    Confidence, DocumentRef, HistoryEntry, RelatedDocument, SearchResult, Suggestion,
    SuggestionKind,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

const CATEGORY_PREFIX: &str = "category:";

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireId {
    Number(serde_json::Number),
    Text(String),
}

impl WireId {
    fn into_string(self) -> String {
        match self {
            WireId::Number(n) => n.to_string(),
            WireId::Text(s) => s,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireSuggestion {
    Structured {
        text: String,
        #[serde(rename = "type", default)]
        kind: Option<String>,
        #[serde(default)]
        confidence: Option<f32>,
        #[serde(default)]
        document_id: Option<WireId>,
    },
    Plain(String),
}

impl WireSuggestion {
    /// `None` for entries with blank text
    pub(crate) fn into_suggestion(self) -> Option<Suggestion> {
        let suggestion = match self {
            WireSuggestion::Plain(text) => {
                let kind = if text.starts_with(CATEGORY_PREFIX) {
                    SuggestionKind::Category
                } else {
                    SuggestionKind::Term
                };
                Suggestion::new(text, kind, Confidence::CERTAIN)
            }
            WireSuggestion::Structured {
                text,
                kind,
                confidence,
                document_id,
            } => {
                let kind = kind
                    .as_deref()
                    .and_then(|k| SuggestionKind::from_str(k).ok())
                    .filter(SuggestionKind::is_remote)
                    .unwrap_or_default();
                let confidence = confidence
                    .map(Confidence::clamped)
                    .unwrap_or(Confidence::CERTAIN);
                let mut suggestion = Suggestion::new(text, kind, confidence);
                if let Some(id) = document_id {
                    suggestion = suggestion.with_related_document(id.into_string());
                }
                suggestion
            }
        };

        match suggestion.validate() {
            Ok(()) => Some(suggestion),
            Err(e) => {
                debug!(error = %e, "Skipping invalid suggestion");
                None
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireCategory {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireDocument {
    pub id: WireId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub categories: Vec<WireCategory>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default, alias = "webViewLink")]
    pub web_view_link: Option<String>,
    #[serde(default)]
    pub last_accessed: Option<String>,
}

impl From<WireDocument> for DocumentRef {
    fn from(wire: WireDocument) -> Self {
        let id = wire.id.into_string();
        let name = wire
            .name
            .or(wire.filename)
            .unwrap_or_else(|| format!("Document {id}"));
        let category = wire
            .category
            .or_else(|| wire.categories.into_iter().next().map(|c| c.name));

        DocumentRef {
            id,
            name,
            category,
            mime_type: wire.mime_type,
            web_view_link: wire.web_view_link,
            last_accessed: wire.last_accessed.as_deref().and_then(parse_timestamp),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireSearchResult {
    pub document: WireDocument,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default, alias = "personalized")]
    pub is_personalized: Option<bool>,
}

impl From<WireSearchResult> for SearchResult {
    fn from(wire: WireSearchResult) -> Self {
        SearchResult::new(wire.document.into(), wire.score)
            .with_highlights(wire.highlights)
            .personalized(wire.is_personalized.unwrap_or(false))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireRelatedDocument {
    pub document: WireDocument,
    #[serde(default)]
    pub similarity_score: f32,
}

impl From<WireRelatedDocument> for RelatedDocument {
    fn from(wire: WireRelatedDocument) -> Self {
        RelatedDocument::new(wire.document.into(), wire.similarity_score)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireHistoryEntry {
    pub query: String,
    pub timestamp: String,
    #[serde(default)]
    pub clicked_category: Option<String>,
    #[serde(default)]
    pub clicked_folder: Option<String>,
}

impl WireHistoryEntry {
    /// `None` when the timestamp cannot be read
    pub(crate) fn into_entry(self) -> Option<HistoryEntry> {
        let Some(timestamp) = parse_timestamp(&self.timestamp) else {
            debug!(timestamp = %self.timestamp, "Skipping history entry with unreadable timestamp");
            return None;
        };
        Some(HistoryEntry {
            query: self.query,
            timestamp,
            clicked_category: self.clicked_category,
            clicked_folder: self.clicked_folder,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct HistoryRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RefreshResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// RFC 3339, or a naive ISO timestamp taken as UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
