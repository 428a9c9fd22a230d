//! Real-time writing suggestions
//!
//! Coordinates suggestion requests for a text editor: edits are debounced
//! per context, only the latest request for a context may update its
//! suggestions, and accepted suggestions are merged back into the text.
//! [`SuggestionEngine`] is the entry point.

pub mod app;
pub mod apply;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod overlay;
pub mod scheduler;
pub mod service;
pub mod store;
pub mod suggestion;


pub use apply::{AppliedEdit, apply, apply_to_document};
pub use config::{Config, load_config};
pub use context::{ContextId, EditContext, Granularity};
pub use engine::{EngineUpdate, KeyOutcome, SuggestionEngine};
pub use error::ScribeError;
pub use service::{HttpSuggestionService, SuggestionService, TransportError};
pub use store::{SuggestionSet, SuggestionStatus, SuggestionStore};
pub use suggestion::{SuggestionItem, SuggestionType};
