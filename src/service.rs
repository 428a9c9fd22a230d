//! Suggestion service abstraction
//!
//! The core only ever talks to the service through [`SuggestionService`].
//! Failures come back as [`TransportError`] values and are turned into
//! state transitions by the request lifecycle, never propagated further.

use futures::future::BoxFuture;
use thiserror::Error;

use crate::context::ContextId;
use crate::suggestion::{SuggestionItem, SuggestionType};

mod http;

pub use http::HttpSuggestionService;

/// Errors that can occur while fetching suggestions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Service is not configured (missing endpoint, bad client setup)
    #[error("Suggestion service not configured: {0}")]
    NotConfigured(String),

    /// Network error during the request
    #[error("Network error: {0}")]
    Network(String),

    /// Request took longer than the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Service returned an error response
    #[error("Service error ({code}): {message}")]
    Api { code: u16, message: String },

    /// Failed to parse the service response
    #[error("Parse error: {0}")]
    Parse(String),
}

/// One suggestion request as handed to the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    pub user_id: String,
    pub session_id: String,
    pub context_id: ContextId,
    pub text: String,
    /// Cursor offset in chars, relative to `text`
    pub cursor: usize,
}

/// Suggestions returned by the service, in service order
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResponse {
    pub suggestions: Vec<SuggestionItem>,
    /// Overall classification of the writing at the cursor
    pub suggestion_type: SuggestionType,
    pub confidence_score: f32,
}

/// Upstream collaborator producing suggestions
///
/// The returned future must not borrow `self`: it is spawned onto the
/// runtime and dropped mid-flight when the request is superseded, which is
/// how an in-progress call gets aborted.
pub trait SuggestionService: Send + Sync {
    fn request_suggestions(
        &self,
        request: ServiceRequest,
    ) -> BoxFuture<'static, Result<ServiceResponse, TransportError>>;
}
