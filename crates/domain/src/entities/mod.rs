//! Domain Entities - search vocabulary shared by every layer

mod document;
mod history_entry;
mod suggestion;

pub use document::{DocumentRef, RelatedDocument, SearchResult};
pub use history_entry::HistoryEntry;
pub use suggestion::Suggestion;
