//! Repository Abstractions - Ports for the Infrastructure Layer
//!
//! Contracts between the coordinator and the remote search backend.

mod history_repository;
pub mod search_repository;

pub use history_repository::HistoryRepository;
pub use search_repository::{SearchRepository, SuggestionRepository};
