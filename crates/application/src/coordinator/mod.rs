//! Search Coordinator
//!
//! Owns the query being typed, debounces suggestion fetches, runs searches,
//! merges suggestion sources and tracks the focused document. Every request
//! carries a [`RequestTag`]; responses whose tag is no longer the latest, or
//! whose key no longer matches the current query (or focused document), are
//! dropped on arrival. In-flight requests are never aborted.
//!
//! State sits behind a `parking_lot::Mutex` that is never held across an
//! `.await`. Spawned work only holds a `Weak` reference, so anything that
//! resolves after [`SearchCoordinator::close`] or drop is a no-op.

mod events;
mod state;

pub use events::{SearchEvent, FOCUS_TOPIC, RESULTS_TOPIC, SELECTION_TOPIC, SUGGESTIONS_TOPIC};
pub use state::SearchSnapshot;

use crate::errors::{ApplicationResult, SearchError};
use crate::sequencer::RequestTag;
use common::{DebounceTimer, EventBus, EventEnvelope};
use domain::config::SearchConfig;
use domain::errors::{BackendResult, DomainError};
use domain::{
    HistoryRepository, RelatedDocument, SearchRepository, SearchResult, Suggestion,
    SuggestionKind, SuggestionRepository,
};
use parking_lot::Mutex;
use state::SearchState;
use std::sync::{Arc, Weak};
use std::time::Instant;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Remote collaborators the coordinator talks to
#[derive(Clone)]
pub struct SearchServices {
    pub suggestions: Arc<dyn SuggestionRepository>,
    pub search: Arc<dyn SearchRepository>,
    pub history: Arc<dyn HistoryRepository>,
}

impl SearchServices {
    /// All three roles served by one backend
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: SuggestionRepository + SearchRepository + HistoryRepository + 'static,
    {
        Self {
            suggestions: backend.clone(),
            search: backend.clone(),
            history: backend,
        }
    }
}

/// What `set_query` decided to do with the new text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryDisposition {
    /// A suggestion fetch is armed for after the debounce window
    Scheduled,
    /// Below the minimum length: suggestions cleared, nothing fetched
    TooShort,
}

/// How an `execute_search` call ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results were applied to the coordinator state
    Delivered { count: usize },
    /// The response was superseded (or the coordinator closed) and dropped
    Stale,
    /// Blank query, nothing was sent
    Skipped,
}

pub struct SearchCoordinator {
    inner: Arc<Inner>,
    timer: DebounceTimer,
}

struct Inner {
    services: SearchServices,
    min_query_len: usize,
    state: Mutex<SearchState>,
    events: EventBus<SearchEvent>,
}

impl SearchCoordinator {
    pub fn new(services: SearchServices, config: &SearchConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                services,
                min_query_len: config.min_query_len,
                state: Mutex::new(SearchState::default()),
                events: EventBus::default(),
            }),
            timer: DebounceTimer::new(config.debounce()),
        }
    }

    /// Store `text` as the current query and debounce a suggestion fetch.
    ///
    /// Never blocks. Must be called from within a tokio runtime.
    pub fn set_query(&self, text: impl Into<String>) -> ApplicationResult<QueryDisposition> {
        let text = text.into();
        let mut state = self.inner.state.lock();
        if state.closed {
            return Err(SearchError::Closed);
        }
        state.query = text.clone();

        if !self.inner.long_enough(&text) {
            self.timer.cancel();
            if state.clear_suggestions() {
                self.inner.publish(SearchEvent::SuggestionsUpdated {
                    query: text,
                    suggestions: Vec::new(),
                });
            }
            return Ok(QueryDisposition::TooShort);
        }

        let weak = Arc::downgrade(&self.inner);
        debug!(query = %text, delay_ms = self.timer.delay().as_millis() as u64, "Suggestion fetch scheduled");
        self.timer.schedule(move || {
            if let Some(inner) = weak.upgrade() {
                inner.start_suggestion_fetch(text);
            }
        });
        Ok(QueryDisposition::Scheduled)
    }

    /// Replace the caller-supplied suggestion strings.
    ///
    /// The displayed list is re-merged right away when the current query is
    /// long enough to show suggestions at all.
    pub fn set_external_suggestions(&self, external: Vec<String>) -> ApplicationResult<()> {
        let mut state = self.inner.state.lock();
        if state.closed {
            return Err(SearchError::Closed);
        }
        state.external = external;

        if self.inner.long_enough(&state.query) {
            state.remerge();
            self.inner.publish(SearchEvent::SuggestionsUpdated {
                query: state.query.clone(),
                suggestions: state.suggestions.clone(),
            });
        }
        Ok(())
    }

    /// Run a search right away, without debouncing.
    ///
    /// `query` becomes the current query; a different query cancels the
    /// pending suggestion fetch and clears the displayed list. On an
    /// authoritative success the result set is replaced wholesale, the error
    /// state is cleared and the query is recorded in history in the
    /// background. On failure the error
    /// state is set and previous results are kept.
    pub async fn execute_search(&self, query: &str) -> ApplicationResult<SearchOutcome> {
        if query.trim().is_empty() {
            return Ok(SearchOutcome::Skipped);
        }

        let tag = {
            let mut state = self.inner.state.lock();
            if state.closed {
                return Err(SearchError::Closed);
            }
            if state.query != query {
                // Suggestions belong to the previous query
                self.timer.cancel();
                state.query = query.to_string();
                if state.clear_suggestions() {
                    self.inner.publish(SearchEvent::SuggestionsUpdated {
                        query: state.query.clone(),
                        suggestions: Vec::new(),
                    });
                }
            }
            state.search_requests.issue(query)
        };

        let started = Instant::now();
        let response = self.inner.services.search.search(&tag.key).await;
        self.inner.apply_search(tag, response, started)
    }

    /// Search for the current query
    pub async fn submit(&self) -> ApplicationResult<SearchOutcome> {
        let query = self.inner.state.lock().query.clone();
        self.execute_search(&query).await
    }

    /// Pick a suggestion from the displayed list.
    ///
    /// The suggestion text becomes the query and the list closes. `External`
    /// suggestions are announced with [`SearchEvent::ExternalSelected`]; a
    /// related document id becomes the focused document. A search always runs.
    pub async fn select_suggestion(&self, suggestion: Suggestion) -> ApplicationResult<SearchOutcome> {
        suggestion.validate()?;
        {
            let mut state = self.inner.state.lock();
            if state.closed {
                return Err(SearchError::Closed);
            }
            self.timer.cancel();
            state.query = suggestion.text.clone();
            if state.clear_suggestions() {
                self.inner.publish(SearchEvent::SuggestionsUpdated {
                    query: state.query.clone(),
                    suggestions: Vec::new(),
                });
            }

            if suggestion.kind == SuggestionKind::External {
                self.inner
                    .publish(SearchEvent::ExternalSelected(suggestion.clone()));
            }

            if let Some(document_id) = suggestion.related_document_id.as_deref() {
                let tag = self.inner.focus_locked(&mut state, document_id)?;
                drop(state);
                self.inner.spawn_related_fetch(tag);
            }
        }

        info!(query = %suggestion.text, kind = %suggestion.kind, "Suggestion selected");
        self.execute_search(&suggestion.text).await
    }

    /// Reset after a related document was chosen from its panel: the query
    /// empties, suggestions clear and `document_id` becomes the focus.
    pub fn clear_for_selection(&self, document_id: &str) -> ApplicationResult<()> {
        validate_document_id(document_id)?;
        let tag = {
            let mut state = self.inner.state.lock();
            if state.closed {
                return Err(SearchError::Closed);
            }
            self.timer.cancel();
            state.query.clear();
            if state.clear_suggestions() {
                self.inner.publish(SearchEvent::SuggestionsUpdated {
                    query: String::new(),
                    suggestions: Vec::new(),
                });
            }
            self.inner.focus_locked(&mut state, document_id)?
        };

        self.inner.spawn_related_fetch(tag);
        Ok(())
    }

    /// Make `document_id` the focused document and load its related documents
    pub fn focus_document(&self, document_id: &str) -> ApplicationResult<()> {
        let tag = {
            let mut state = self.inner.state.lock();
            if state.closed {
                return Err(SearchError::Closed);
            }
            self.inner.focus_locked(&mut state, document_id)?
        };

        self.inner.spawn_related_fetch(tag);
        Ok(())
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.inner.state.lock().snapshot()
    }

    pub fn query(&self) -> String {
        self.inner.state.lock().query.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope<SearchEvent>> {
        self.inner.events.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }

    /// Tear down: cancel the pending timer and make every late response a no-op.
    /// Idempotent.
    pub fn close(&self) {
        let mut state = self.inner.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        state.suggestion_requests.invalidate();
        state.search_requests.invalidate();
        state.related_requests.invalidate();
        self.timer.cancel();
        debug!("Search coordinator closed");
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        self.close();
    }
}

impl Inner {
    fn long_enough(&self, query: &str) -> bool {
        query.chars().count() >= self.min_query_len
    }

    // Called with the state lock held so subscribers observe events in state order.
    fn publish(&self, event: SearchEvent) {
        self.events.publish(event.topic(), event);
    }

    fn start_suggestion_fetch(self: Arc<Self>, query: String) {
        let tag = {
            let mut state = self.state.lock();
            if state.closed || state.query != query {
                debug!(query = %query, "Debounced query no longer current, fetch skipped");
                return;
            }
            state.suggestion_requests.issue(query)
        };

        let repository = self.services.suggestions.clone();
        let weak = Arc::downgrade(&self);
        drop(self);

        tokio::spawn(async move {
            debug!(query = %tag.key, seq = tag.seq, "Fetching suggestions");
            let started = Instant::now();
            let response = repository.fetch_suggestions(&tag.key).await;
            apply_later(&weak, |inner| inner.apply_suggestions(tag, response, started));
        });
    }

    fn apply_suggestions(
        &self,
        tag: RequestTag,
        response: BackendResult<Vec<Suggestion>>,
        started: Instant,
    ) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        let latest = state.suggestion_requests.settle(&tag);
        if !latest || tag.key != state.query {
            debug!(query = %tag.key, seq = tag.seq, current = %state.query, "Stale suggestions dropped");
            return;
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        match response {
            Ok(remote) => {
                state.remote = remote;
                state.remerge();
                debug!(query = %tag.key, seq = tag.seq, count = state.suggestions.len(), duration_ms, "Suggestions updated");
                self.publish(SearchEvent::SuggestionsUpdated {
                    query: tag.key,
                    suggestions: state.suggestions.clone(),
                });
            }
            Err(source) => {
                state.remote.clear();
                state.suggestions.clear();
                let error = SearchError::suggestion_fetch_failed(&tag.key, source);
                warn!(query = %tag.key, seq = tag.seq, duration_ms, error = %error, "Suggestion fetch failed");
                self.publish(SearchEvent::SuggestionsFailed {
                    query: tag.key,
                    error,
                });
            }
        }
    }

    fn apply_search(
        &self,
        tag: RequestTag,
        response: BackendResult<Vec<SearchResult>>,
        started: Instant,
    ) -> ApplicationResult<SearchOutcome> {
        let mut state = self.state.lock();
        if state.closed {
            debug!(query = %tag.key, seq = tag.seq, "Search resolved after close, dropped");
            return Ok(SearchOutcome::Stale);
        }
        let latest = state.search_requests.settle(&tag);
        if !latest || tag.key != state.query {
            debug!(query = %tag.key, seq = tag.seq, current = %state.query, "Stale search response dropped");
            return Ok(SearchOutcome::Stale);
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        match response {
            Ok(results) => {
                let count = results.len();
                state.results = results;
                state.error = None;
                info!(query = %tag.key, seq = tag.seq, count, duration_ms, "Search delivered");
                self.publish(SearchEvent::ResultsUpdated {
                    query: tag.key.clone(),
                    results: state.results.clone(),
                });
                drop(state);

                self.record_history(tag.key);
                Ok(SearchOutcome::Delivered { count })
            }
            Err(source) => {
                let error = SearchError::search_failed(&tag.key, source);
                error!(query = %tag.key, seq = tag.seq, duration_ms, error = %error, "Search failed");
                state.error = Some(error.clone());
                self.publish(SearchEvent::SearchFailed {
                    query: tag.key,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    /// Fire-and-forget; the outcome never reaches coordinator state
    fn record_history(&self, query: String) {
        let history = self.services.history.clone();
        tokio::spawn(async move {
            if let Err(source) = history.record_history(&query).await {
                let error = SearchError::history_update_failed(&query, source);
                warn!(query = %query, error = %error, "History update failed");
            }
        });
    }

    fn focus_locked(
        &self,
        state: &mut SearchState,
        document_id: &str,
    ) -> ApplicationResult<RequestTag> {
        validate_document_id(document_id)?;

        state.focused_document = Some(document_id.to_string());
        state.related.clear();
        self.publish(SearchEvent::FocusChanged {
            document_id: state.focused_document.clone(),
        });
        Ok(state.related_requests.issue(document_id))
    }

    fn spawn_related_fetch(self: &Arc<Self>, tag: RequestTag) {
        let repository = self.services.search.clone();
        let weak = Arc::downgrade(self);

        tokio::spawn(async move {
            debug!(document_id = %tag.key, seq = tag.seq, "Fetching related documents");
            let response = repository.related_documents(&tag.key).await;
            apply_later(&weak, |inner| inner.apply_related(tag, response));
        });
    }

    fn apply_related(&self, tag: RequestTag, response: BackendResult<Vec<RelatedDocument>>) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        let latest = state.related_requests.settle(&tag);
        if !latest || state.focused_document.as_deref() != Some(tag.key.as_str()) {
            debug!(document_id = %tag.key, seq = tag.seq, "Stale related documents dropped");
            return;
        }

        match response {
            Ok(related) => {
                state.related = related;
                debug!(document_id = %tag.key, count = state.related.len(), "Related documents updated");
            }
            Err(source) => {
                state.related.clear();
                let error = SearchError::related_fetch_failed(&tag.key, source);
                warn!(document_id = %tag.key, error = %error, "Related documents fetch failed");
            }
        }
        self.publish(SearchEvent::RelatedUpdated {
            document_id: tag.key,
            related: state.related.clone(),
        });
    }
}

fn validate_document_id(document_id: &str) -> ApplicationResult<()> {
    if document_id.trim().is_empty() {
        return Err(DomainError::EmptyDocumentId.into());
    }
    Ok(())
}

/// Run `apply` only if the coordinator still exists
fn apply_later(weak: &Weak<Inner>, apply: impl FnOnce(&Inner)) {
    match weak.upgrade() {
        Some(inner) => apply(&inner),
        None => debug!("Response arrived after teardown, dropped"),
    }
}
