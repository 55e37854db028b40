use crate::render;
use anyhow::{bail, Context, Result};
use application::{QueryDisposition, SearchCoordinator, SearchError, SearchEvent, SearchServices};
use clap::Args;
use common::{EventEnvelope, RequestContext};
use console::style;
use domain::config::SearchConfig;
use domain::{HistoryRepository, SearchRepository, Suggestion};
use indicatif::{ProgressBar, ProgressStyle};
use infrastructure::HttpSearchBackend;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::timeout;
use tracing::{warn, Instrument};

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Free-text query
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Do not record the query in the search history
    #[arg(long)]
    pub no_history: bool,
}

impl SearchCommand {
    pub async fn execute(&self, backend: &HttpSearchBackend) -> Result<()> {
        let query = self.query.join(" ");
        if query.trim().is_empty() {
            bail!("Query cannot be blank");
        }

        let ctx = RequestContext::new();
        let progress = spinner("Searching...");
        let results = backend
            .search(&query)
            .instrument(ctx.span("search"))
            .await;
        progress.finish_and_clear();
        let results = results.with_context(|| format!("Search for '{query}' failed"))?;

        if results.is_empty() {
            println!("{} no documents match '{}'", style("=").dim(), query);
        } else {
            println!(
                "{} {} result(s) for '{}'",
                style("=").green().bold(),
                results.len(),
                query
            );
            for (i, result) in results.iter().enumerate() {
                println!("{}", render::result_line(i, result));
            }
        }

        if !self.no_history {
            if let Err(e) = backend.record_history(&query).await {
                warn!(error = %e, "Failed to record search history");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct SuggestCommand {
    /// Partial query
    pub query: String,

    /// Caller-supplied suggestions appended after the backend's (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub external: Vec<String>,
}

impl SuggestCommand {
    /// One debounced fetch through a short-lived coordinator
    pub async fn execute(&self, backend: Arc<HttpSearchBackend>, search: &SearchConfig) -> Result<()> {
        let patience = search.debounce() + backend.timeout() + Duration::from_secs(1);
        let coordinator = SearchCoordinator::new(SearchServices::from_backend(backend), search);
        let mut events = coordinator.subscribe();

        coordinator.set_external_suggestions(self.external.clone())?;
        if coordinator.set_query(self.query.clone())? == QueryDisposition::TooShort {
            println!(
                "{} '{}' is shorter than {} characters, nothing to suggest",
                style("?").yellow(),
                self.query,
                search.min_query_len
            );
            return Ok(());
        }

        let ctx = RequestContext::new();
        let outcome = timeout(patience, wait_for_suggestions(&mut events, &self.query))
            .instrument(ctx.span("suggest"))
            .await
            .with_context(|| format!("Timed out waiting for suggestions for '{}'", self.query))?;
        let suggestions =
            outcome.with_context(|| format!("Suggestions for '{}' failed", self.query))?;

        if suggestions.is_empty() {
            println!("{} no suggestions", style("=").dim());
        }
        for (i, suggestion) in suggestions.iter().enumerate() {
            println!("{}", render::suggestion_line(i, suggestion));
        }
        Ok(())
    }
}

async fn wait_for_suggestions(
    events: &mut broadcast::Receiver<EventEnvelope<SearchEvent>>,
    query: &str,
) -> Result<Vec<Suggestion>, SearchError> {
    loop {
        match events.recv().await {
            Ok(envelope) => match envelope.payload {
                SearchEvent::SuggestionsUpdated {
                    query: answered,
                    suggestions,
                } if answered == query => return Ok(suggestions),
                SearchEvent::SuggestionsFailed {
                    query: answered,
                    error,
                } if answered == query => return Err(error),
                _ => {}
            },
            Err(RecvError::Lagged(_)) => {}
            Err(RecvError::Closed) => return Err(SearchError::Closed),
        }
    }
}

#[derive(Debug, Args)]
pub struct RelatedCommand {
    /// Document id
    pub document_id: String,
}

impl RelatedCommand {
    pub async fn execute(&self, backend: &HttpSearchBackend) -> Result<()> {
        if self.document_id.trim().is_empty() {
            bail!("Document id cannot be blank");
        }

        let related = backend
            .related_documents(&self.document_id)
            .await
            .with_context(|| format!("Related documents for #{} failed", self.document_id))?;

        println!(
            "{} {} document(s) related to #{}",
            style("~").cyan(),
            related.len(),
            self.document_id
        );
        for (i, document) in related.iter().enumerate() {
            println!("{}", render::related_line(i, document));
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct HistoryCommand {
    /// Show at most this many entries, newest first as returned
    #[arg(short = 'n', long, default_value_t = 20)]
    pub limit: usize,
}

impl HistoryCommand {
    pub async fn execute(&self, backend: &HttpSearchBackend) -> Result<()> {
        let history = backend
            .history()
            .await
            .context("Failed to load search history")?;

        if history.is_empty() {
            println!("{} no search history", style("=").dim());
        }
        for entry in history.iter().take(self.limit) {
            println!("{}", render::history_line(entry));
        }
        Ok(())
    }
}

/// Probe `/healthz`; fails unless the backend reports itself healthy
pub async fn health(backend: &HttpSearchBackend) -> Result<()> {
    let health = backend
        .health()
        .await
        .with_context(|| format!("Backend at {} is unreachable", backend.base_url()))?;

    if health.status != "healthy" {
        bail!("Backend reports status '{}'", health.status);
    }

    println!(
        "{} {} is {}{}",
        style("[✓]").green().bold(),
        backend.base_url(),
        health.status,
        health
            .timestamp
            .map(|ts| format!(" ({ts})"))
            .unwrap_or_default()
    );
    Ok(())
}
