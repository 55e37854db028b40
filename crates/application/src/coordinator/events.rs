use crate::errors::SearchError;
use common::Topic;
use domain::{DocumentId, RelatedDocument, SearchResult, Suggestion};

pub const SUGGESTIONS_TOPIC: Topic = Topic("search.suggestions");
pub const RESULTS_TOPIC: Topic = Topic("search.results");
pub const SELECTION_TOPIC: Topic = Topic("search.selection");
pub const FOCUS_TOPIC: Topic = Topic("search.focus");

/// Notification published to the presentation layer after every state change
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// Displayed suggestion list changed (possibly to empty)
    SuggestionsUpdated {
        query: String,
        suggestions: Vec<Suggestion>,
    },
    SuggestionsFailed {
        query: String,
        error: SearchError,
    },
    /// Result set replaced wholesale
    ResultsUpdated {
        query: String,
        results: Vec<SearchResult>,
    },
    SearchFailed {
        query: String,
        error: SearchError,
    },
    /// An `External` suggestion was selected; the caller runs its own side effects
    ExternalSelected(Suggestion),
    FocusChanged {
        document_id: Option<DocumentId>,
    },
    RelatedUpdated {
        document_id: DocumentId,
        related: Vec<RelatedDocument>,
    },
}

impl SearchEvent {
    pub fn topic(&self) -> Topic {
        match self {
            Self::SuggestionsUpdated { .. } | Self::SuggestionsFailed { .. } => SUGGESTIONS_TOPIC,
            Self::ResultsUpdated { .. } | Self::SearchFailed { .. } => RESULTS_TOPIC,
            Self::ExternalSelected(_) => SELECTION_TOPIC,
            Self::FocusChanged { .. } | Self::RelatedUpdated { .. } => FOCUS_TOPIC,
        }
    }
}
