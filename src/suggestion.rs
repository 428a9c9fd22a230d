//! Suggestion module
//!
//! Types describing a single AI-generated writing suggestion.

pub mod types;

// Re-export main types
pub use types::{SuggestionItem, SuggestionType, clamp_confidence};
