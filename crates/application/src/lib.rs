//! # Application Layer
//!
//! Coordinates typing, suggestion fetches and searches against the
//! repository ports defined in `domain`:
//! - `coordinator` - the `SearchCoordinator` and the events it publishes
//! - `merge` - pure merge of remote and caller-supplied suggestions
//! - `sequencer` - request tags used to drop superseded responses
//!
//! ## Dependency Direction
//!
//! ```text
//! Application Layer → Domain Layer (entities, repositories, config)
//! Infrastructure → Domain Layer (implements repositories)
//! ```

pub mod coordinator;
pub mod errors;
pub mod merge;
pub mod sequencer;

pub use coordinator::{
    QueryDisposition, SearchCoordinator, SearchEvent, SearchOutcome, SearchServices,
    SearchSnapshot,
};
pub use errors::{ApplicationResult, SearchError};
pub use merge::merge_suggestions;
pub use sequencer::{RequestSequencer, RequestTag};
