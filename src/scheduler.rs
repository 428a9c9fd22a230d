//! Debounce scheduler
//!
//! Coalesces bursts of edits into a single request per context. Each
//! scheduled call starts a timer task; a later call for the same context
//! cancels it and starts over, so a request only fires after the context
//! has been quiet for the whole window.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

use crate::context::{ContextId, EditContext};
use crate::events::EngineEvent;

/// Why an edit did not schedule a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Text is empty or whitespace only
    Empty,
    /// Text has fewer than `min` chars
    TooShort { len: usize, min: usize },
    /// The edit left the context's text as it was
    Unchanged,
}

/// Result of [`DebounceScheduler::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Scheduled,
    Skipped(SkipReason),
}

struct PendingTimer {
    generation: u64,
    cancel: CancellationToken,
}

/// Per-context debounce timers
pub struct DebounceScheduler {
    window: Duration,
    min_length: usize,
    pending: HashMap<ContextId, PendingTimer>,
    generation: u64,
    event_tx: UnboundedSender<EngineEvent>,
}

impl DebounceScheduler {
    pub fn new(window: Duration, min_length: usize, event_tx: UnboundedSender<EngineEvent>) -> Self {
        Self {
            window,
            min_length,
            pending: HashMap::new(),
            generation: 0,
            event_tx,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Check whether `text` is worth requesting suggestions for
    pub fn validate(&self, text: &str) -> Result<(), SkipReason> {
        if text.trim().is_empty() {
            return Err(SkipReason::Empty);
        }
        let len = text.chars().count();
        if len < self.min_length {
            return Err(SkipReason::TooShort {
                len,
                min: self.min_length,
            });
        }
        Ok(())
    }

    /// Schedule a request for `context` after the quiescence window
    ///
    /// Any pending timer for the same context is cancelled first, even when
    /// the new text is skipped, so a shorter edit never lets an older one
    /// fire. Must be called from within a tokio runtime.
    pub fn schedule(&mut self, context: EditContext) -> ScheduleOutcome {
        self.cancel(context.context_id);

        if let Err(reason) = self.validate(&context.text) {
            log::trace!("Not scheduling {}: {:?}", context.context_id, reason);
            return ScheduleOutcome::Skipped(reason);
        }

        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let cancel = CancellationToken::new();
        self.pending.insert(
            context.context_id,
            PendingTimer {
                generation,
                cancel: cancel.clone(),
            },
        );

        log::debug!(
            "Scheduled {} in {:?} (timer {})",
            context.context_id,
            self.window,
            generation
        );

        // Deadline taken now; the task may not be polled until later
        let deadline = Instant::now() + self.window;
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                _ = sleep_until(deadline) => {
                    let _ = event_tx.send(EngineEvent::Fire { context, generation });
                }
            }
        });

        ScheduleOutcome::Scheduled
    }

    /// Claim a fired timer
    ///
    /// Returns true if `generation` is still the pending timer for
    /// `context_id` and removes it; a timer that was reset or cancelled
    /// after it fired returns false.
    pub fn take_fired(&mut self, context_id: ContextId, generation: u64) -> bool {
        match self.pending.get(&context_id) {
            Some(timer) if timer.generation == generation => {
                self.pending.remove(&context_id);
                true
            }
            _ => false,
        }
    }

    /// Cancel the pending timer for `context_id`, if any
    pub fn cancel(&mut self, context_id: ContextId) -> bool {
        match self.pending.remove(&context_id) {
            Some(timer) => {
                timer.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer
    pub fn cancel_all(&mut self) {
        for (_, timer) in self.pending.drain() {
            timer.cancel.cancel();
        }
    }

    pub fn is_pending(&self, context_id: ContextId) -> bool {
        self.pending.contains_key(&context_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod scheduler_tests;
