//! Messages from spawned timer and fetch tasks back to the engine
//!
//! Tasks never touch suggestion state directly; they report through this
//! channel and the engine applies the result on its own turn.

use crate::context::{ContextId, EditContext};
use crate::service::{ServiceResponse, TransportError};

/// Event delivered to the engine loop
#[derive(Debug)]
pub enum EngineEvent {
    /// A debounce timer elapsed without being reset
    Fire {
        context: EditContext,
        /// Identifies the timer, so a fire racing a reset can be ignored
        generation: u64,
    },
    /// A suggestion request finished
    Resolved(Resolved),
}

/// Outcome of one suggestion request
#[derive(Debug)]
pub struct Resolved {
    pub context_id: ContextId,
    pub token: u64,
    pub outcome: Result<ServiceResponse, TransportError>,
}
