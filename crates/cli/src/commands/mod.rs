pub mod config;
pub mod search;

pub use config::ConfigCommand;
pub use search::{health, HistoryCommand, RelatedCommand, SearchCommand, SuggestCommand};
