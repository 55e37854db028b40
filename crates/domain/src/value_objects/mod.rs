//! Domain Value Objects - Immutable domain concepts
//!
//! Value objects represent concepts without identity.

pub mod confidence;
pub mod suggestion_kind;

pub use confidence::Confidence;
pub use suggestion_kind::SuggestionKind;
