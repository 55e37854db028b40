use super::wire::{
    HistoryRequest, RefreshResponse, WireHistoryEntry, WireRelatedDocument, WireSearchResult,
    WireSuggestion,
};
use crate::session::Session;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use common::OperationTimer;
use domain::config::BackendConfig;
use domain::{
    BackendError, BackendResult, HistoryEntry, HistoryRepository, RelatedDocument,
    SearchRepository, SearchResult, Suggestion, SuggestionRepository,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Longest slice of an error body kept in `BackendError::Server`
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// reqwest client for the document-management backend's search API.
///
/// Every call carries the session's bearer token. A 401 triggers one token
/// refresh and one retry; if that fails the session is cleared.
#[derive(Debug, Clone)]
pub struct HttpSearchBackend {
    client: Client,
    base_url: Url,
    timeout: Duration,
    session: Session,
}

impl HttpSearchBackend {
    pub fn new(config: &BackendConfig, session: Session) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid backend URL: {}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("Backend URL cannot be used as a base: {}", config.base_url);
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("dms-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            timeout: config.timeout(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Per-request timeout applied by the underlying client
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Unauthenticated liveness probe
    pub async fn health(&self) -> BackendResult<HealthStatus> {
        let response = self
            .client
            .get(self.url(&["healthz"]))
            .send()
            .await
            .map_err(map_transport_error)?;
        let response = ensure_success(response).await?;
        decode(response).await
    }

    /// Send an authorized request, refreshing the token once on 401
    async fn execute<F>(&self, operation: &str, build: F) -> BackendResult<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut timer = OperationTimer::new(operation);
        let result = self.execute_inner(&build).await;
        if let Err(e) = &result {
            timer.add_field("error_kind", e.kind());
        }
        timer.finish_with_result(&result);
        result
    }

    async fn execute_inner<F>(&self, build: &F) -> BackendResult<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let token = self
            .session
            .token()
            .ok_or_else(|| BackendError::Unauthorized("no auth token in session".to_string()))?;

        let response = self.send(build, &token).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return ensure_success(response).await;
        }

        debug!("Backend answered 401, refreshing token");
        let Some(fresh) = self.refresh_token(&token).await else {
            self.session.clear();
            return Err(BackendError::Unauthorized(
                "token rejected and refresh failed".to_string(),
            ));
        };

        let retried = self.send(build, &fresh).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            self.session.clear();
            return Err(BackendError::Unauthorized(
                "refreshed token rejected".to_string(),
            ));
        }
        ensure_success(retried).await
    }

    async fn send<F>(&self, build: &F, token: &str) -> BackendResult<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        build(&self.client)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_transport_error)
    }

    /// New token from `POST /auth/refresh`, stored in the session on success
    async fn refresh_token(&self, current: &str) -> Option<String> {
        let response = self
            .client
            .post(self.url(&["auth", "refresh"]))
            .bearer_auth(current)
            .json(&serde_json::json!({}))
            .send()
            .await;

        let response = match response {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!(status = response.status().as_u16(), "Token refresh rejected");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                return None;
            }
        };

        match response.json::<RefreshResponse>().await {
            Ok(RefreshResponse { token: Some(token) }) if !token.is_empty() => {
                info!("Auth token refreshed");
                self.session.set_token(token.clone());
                Some(token)
            }
            Ok(_) => {
                warn!("Token refresh response carried no token");
                None
            }
            Err(e) => {
                warn!(error = %e, "Token refresh response unreadable");
                None
            }
        }
    }
}

#[async_trait]
impl SuggestionRepository for HttpSearchBackend {
    async fn fetch_suggestions(&self, query: &str) -> BackendResult<Vec<Suggestion>> {
        let url = self.url(&["api", "search", "suggestions"]);
        let response = self
            .execute("fetch_suggestions", |client| {
                client.get(url.clone()).query(&[("query", query)])
            })
            .await?;

        let wire: Vec<WireSuggestion> = decode(response).await?;
        Ok(wire
            .into_iter()
            .filter_map(WireSuggestion::into_suggestion)
            .collect())
    }
}

#[async_trait]
impl SearchRepository for HttpSearchBackend {
    async fn search(&self, query: &str) -> BackendResult<Vec<SearchResult>> {
        let url = self.url(&["api", "search"]);
        let response = self
            .execute("search", |client| {
                client.get(url.clone()).query(&[("query", query)])
            })
            .await?;

        let wire: Vec<WireSearchResult> = decode(response).await?;
        Ok(wire.into_iter().map(SearchResult::from).collect())
    }

    async fn related_documents(&self, document_id: &str) -> BackendResult<Vec<RelatedDocument>> {
        let url = self.url(&["api", "search", "related", document_id]);
        let response = self
            .execute("related_documents", |client| client.get(url.clone()))
            .await?;

        let wire: Vec<WireRelatedDocument> = decode(response).await?;
        Ok(wire.into_iter().map(RelatedDocument::from).collect())
    }
}

#[async_trait]
impl HistoryRepository for HttpSearchBackend {
    async fn record_history(&self, query: &str) -> BackendResult<()> {
        let url = self.url(&["api", "search", "history"]);
        self.execute("record_history", |client| {
            client.post(url.clone()).json(&HistoryRequest { query })
        })
        .await?;
        Ok(())
    }

    async fn history(&self) -> BackendResult<Vec<HistoryEntry>> {
        let url = self.url(&["api", "search", "history"]);
        let response = self
            .execute("history", |client| client.get(url.clone()))
            .await?;

        let wire: Vec<WireHistoryEntry> = decode(response).await?;
        Ok(wire
            .into_iter()
            .filter_map(WireHistoryEntry::into_entry)
            .collect())
    }
}

fn map_transport_error(error: reqwest::Error) -> BackendError {
    if error.is_decode() {
        BackendError::Decode(error.to_string())
    } else if error.is_timeout() {
        BackendError::network(format!("request timed out: {error}"))
    } else {
        BackendError::network(error.to_string())
    }
}

async fn ensure_success(response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(BackendError::Unauthorized("backend rejected token".to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    Err(BackendError::server(status.as_u16(), error_message(status, &body)))
}

/// FastAPI puts the reason in `detail`; otherwise keep the start of the body
fn error_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: serde_json::Value,
    }

    if let Ok(ErrorBody { detail }) = serde_json::from_str::<ErrorBody>(body) {
        return match detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
    }

    let body = body.trim();
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }
    body.chars().take(MAX_ERROR_BODY).collect()
}

async fn decode<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))
}
