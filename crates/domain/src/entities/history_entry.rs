//! HistoryEntry - one submitted query as recorded by the remote history service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only record owned by the backend; the coordinator only writes these
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clicked_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clicked_folder: Option<String>,
}

impl HistoryEntry {
    pub fn new(query: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            query: query.into(),
            timestamp,
            clicked_category: None,
            clicked_folder: None,
        }
    }
}
