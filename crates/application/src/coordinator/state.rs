use crate::errors::SearchError;
use crate::merge::merge_suggestions;
use crate::sequencer::RequestSequencer;
use domain::{DocumentId, RelatedDocument, SearchResult, Suggestion};

/// Read-only copy of everything the presentation layer may display
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    pub query: String,
    /// Displayed suggestions in merge order
    pub suggestions: Vec<Suggestion>,
    pub results: Vec<SearchResult>,
    /// Visible error of the last authoritative search, if it failed
    pub error: Option<SearchError>,
    pub focused_document: Option<DocumentId>,
    pub related: Vec<RelatedDocument>,
    pub suggestions_loading: bool,
    pub searching: bool,
    pub related_loading: bool,
}

/// Mutable coordinator state; only touched inside one critical section at a time
#[derive(Debug, Default)]
pub(crate) struct SearchState {
    pub query: String,
    /// Last authoritative backend list, kept so external changes can re-merge
    pub remote: Vec<Suggestion>,
    pub external: Vec<String>,
    pub suggestions: Vec<Suggestion>,
    pub results: Vec<SearchResult>,
    pub error: Option<SearchError>,
    pub focused_document: Option<DocumentId>,
    pub related: Vec<RelatedDocument>,
    pub suggestion_requests: RequestSequencer,
    pub search_requests: RequestSequencer,
    pub related_requests: RequestSequencer,
    pub closed: bool,
}

impl SearchState {
    /// Recompute the displayed list from the remote and external sources
    pub fn remerge(&mut self) {
        self.suggestions = merge_suggestions(&self.remote, &self.external);
    }

    /// Drop every suggestion and forget any outstanding suggestion request.
    /// Returns whether the displayed list changed.
    pub fn clear_suggestions(&mut self) -> bool {
        self.suggestion_requests.invalidate();
        self.remote.clear();
        let changed = !self.suggestions.is_empty();
        self.suggestions.clear();
        changed
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            query: self.query.clone(),
            suggestions: self.suggestions.clone(),
            results: self.results.clone(),
            error: self.error.clone(),
            focused_document: self.focused_document.clone(),
            related: self.related.clone(),
            suggestions_loading: self.suggestion_requests.in_flight(),
            searching: self.search_requests.in_flight(),
            related_loading: self.related_requests.in_flight(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_suggestions_reports_change() {
        let mut state = SearchState::default();
        assert!(!state.clear_suggestions());

        state.remote = vec![Suggestion::term("tax")];
        state.external = vec!["receipts".to_string()];
        state.remerge();
        assert_eq!(state.suggestions.len(), 2);

        assert!(state.clear_suggestions());
        assert!(state.remote.is_empty());
        // Caller-supplied strings survive a clear
        assert_eq!(state.external, vec!["receipts".to_string()]);
    }

    #[test]
    fn test_snapshot_reflects_in_flight_requests() {
        let mut state = SearchState::default();
        let tag = state.search_requests.issue("invoice");
        assert!(state.snapshot().searching);

        state.search_requests.settle(&tag);
        assert!(!state.snapshot().searching);
    }
}
