//! Suggestion engine
//!
//! Ties the pipeline together for one editor: change detection, debounce,
//! request lifecycle, store and overlay. Spawned timer and fetch tasks
//! report back over a channel; the engine is the only thing that mutates
//! the store, on its own turn, in [`SuggestionEngine::poll`] or
//! [`SuggestionEngine::next_event`].

use std::collections::HashMap;
use std::sync::Arc;

use ratatui::crossterm::event::KeyEvent;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::apply::{AppliedEdit, apply_to_document};
use crate::config::Config;
use crate::context::{ChangeDetector, ContextId, EditContext, Granularity, context_text};
use crate::events::{EngineEvent, Resolved};
use crate::lifecycle::{RequestIdentity, RequestLifecycle, Resolution, SuggestionRequest};
use crate::overlay::{Direction, OverlayAction, OverlayController, overlay_action};
use crate::scheduler::{DebounceScheduler, ScheduleOutcome, SkipReason};
use crate::service::SuggestionService;
use crate::store::{SuggestionSet, SuggestionStatus, SuggestionStore};

/// What the engine did with a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not an overlay key; the editor should handle it
    Ignored,
    /// Handled by the overlay
    Consumed,
    /// A suggestion was accepted; install this text in the editor
    Accepted(AppliedEdit),
}

/// What handling one engine event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineUpdate {
    /// A debounce timer fired and a request went out
    Issued(SuggestionRequest),
    /// A timer fired after it had been reset or cancelled
    StaleFire(ContextId),
    /// A request finished
    Resolved {
        context_id: ContextId,
        resolution: Resolution,
    },
}

pub struct SuggestionEngine {
    detector: ChangeDetector,
    scheduler: DebounceScheduler,
    lifecycle: RequestLifecycle,
    store: SuggestionStore,
    overlay: OverlayController,
    events: UnboundedReceiver<EngineEvent>,
    /// Context each request was issued for, kept for retry
    last_issued: HashMap<ContextId, EditContext>,
    shut_down: bool,
}

impl SuggestionEngine {
    pub fn new(config: &Config, service: Arc<dyn SuggestionService>) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        let suggestions = &config.suggestions;

        let identity = RequestIdentity {
            user_id: config.service.user_id.clone(),
            session_id: config.service.session_id.clone(),
        };

        Self {
            detector: ChangeDetector::new(suggestions.granularity),
            scheduler: DebounceScheduler::new(
                suggestions.debounce(),
                suggestions.min_length,
                event_tx.clone(),
            ),
            lifecycle: RequestLifecycle::new(
                service,
                identity,
                suggestions.max_suggestions,
                event_tx,
            ),
            store: SuggestionStore::new(),
            overlay: OverlayController::new(),
            events,
            last_issued: HashMap::new(),
            shut_down: false,
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.detector.granularity()
    }

    pub fn active_context(&self) -> Option<ContextId> {
        self.overlay.active()
    }

    /// The editor's text changed
    ///
    /// Moves the overlay to the edited context and (re)starts its debounce
    /// timer. Must be called from within a tokio runtime.
    pub fn on_edit(&mut self, text: &str, cursor: usize) -> ScheduleOutcome {
        if self.shut_down {
            return ScheduleOutcome::Skipped(SkipReason::Unchanged);
        }
        self.drop_shifted_contexts(text);

        match self.detector.observe_edit(text, cursor) {
            Some(context) => {
                self.overlay.set_active(Some(context.context_id));
                self.scheduler.schedule(context)
            }
            None => {
                let context = self.detector.observe_click(text, cursor);
                self.overlay.set_active(Some(context.context_id));
                ScheduleOutcome::Skipped(SkipReason::Unchanged)
            }
        }
    }

    /// The cursor moved without an edit
    pub fn on_click(&mut self, text: &str, cursor: usize) -> ContextId {
        let context = self.detector.observe_click(text, cursor);
        self.overlay.set_active(Some(context.context_id));
        context.context_id
    }

    /// Handle every event that is already waiting, without blocking
    ///
    /// Returns how many were handled.
    pub fn poll(&mut self) -> usize {
        let mut handled = 0;
        while !self.shut_down {
            match self.events.try_recv() {
                Ok(event) => {
                    self.handle_event(event);
                    handled += 1;
                }
                Err(_) => break,
            }
        }
        handled
    }

    /// Wait for the next event and handle it
    ///
    /// Returns `None` once the engine has been shut down.
    pub async fn next_event(&mut self) -> Option<EngineUpdate> {
        if self.shut_down {
            return None;
        }
        let event = self.events.recv().await?;
        Some(self.handle_event(event))
    }

    fn handle_event(&mut self, event: EngineEvent) -> EngineUpdate {
        match event {
            EngineEvent::Fire {
                context,
                generation,
            } => {
                let context_id = context.context_id;
                if !self.scheduler.take_fired(context_id, generation) {
                    log::debug!("Ignoring reset timer {} for {}", generation, context_id);
                    return EngineUpdate::StaleFire(context_id);
                }
                let request = self.lifecycle.issue(&context, &mut self.store);
                self.last_issued.insert(context_id, context);
                EngineUpdate::Issued(request)
            }
            EngineEvent::Resolved(resolved) => self.handle_resolved(resolved),
        }
    }

    fn handle_resolved(&mut self, resolved: Resolved) -> EngineUpdate {
        let context_id = resolved.context_id;
        let resolution = self.lifecycle.resolve(resolved, &mut self.store);
        EngineUpdate::Resolved {
            context_id,
            resolution,
        }
    }

    /// Apply the overlay keyboard contract to `key`
    ///
    /// `document` is the editor's full text, used to build the edit when a
    /// suggestion is accepted.
    pub fn handle_key(&mut self, key: KeyEvent, document: &str) -> KeyOutcome {
        self.drop_shifted_contexts(document);
        let Some(action) = overlay_action(key, self.overlay()) else {
            return KeyOutcome::Ignored;
        };

        match action {
            OverlayAction::Accept(index) => match self.accept(index, document) {
                Some(edit) => KeyOutcome::Accepted(edit),
                None => KeyOutcome::Consumed,
            },
            OverlayAction::Reject => {
                self.reject();
                KeyOutcome::Consumed
            }
            OverlayAction::Navigate(direction) => {
                self.navigate(direction);
                KeyOutcome::Consumed
            }
            OverlayAction::Retry => {
                self.retry();
                KeyOutcome::Consumed
            }
        }
    }

    pub fn navigate(&mut self, direction: Direction) -> Option<usize> {
        self.overlay.navigate(&mut self.store, direction)
    }

    /// Accept the item at `index` (default: the selected one)
    ///
    /// Clears the context and returns `document` with the suggestion
    /// applied. Returns `None` if nothing is selectable at `index`, or if
    /// the context no longer holds the text the suggestions were made for.
    pub fn accept(&mut self, index: Option<usize>, document: &str) -> Option<AppliedEdit> {
        self.drop_shifted_contexts(document);
        let accepted = self.overlay.accept(&mut self.store, index)?;
        self.settle(accepted.context_id);
        Some(apply_to_document(
            &accepted.item,
            document,
            accepted.context_id,
        ))
    }

    /// Dismiss the active context's suggestions without applying any
    pub fn reject(&mut self) -> bool {
        let rejected = self.overlay.reject(&mut self.store);
        if let Some(context_id) = self.overlay.active() {
            self.settle(context_id);
        }
        rejected
    }

    /// Re-issue the last request for the active context after an error
    pub fn retry(&mut self) -> Option<SuggestionRequest> {
        let context_id = self.overlay.active()?;
        if self.store.status(context_id) != SuggestionStatus::Error {
            return None;
        }
        let context = self.last_issued.get(&context_id)?.clone();
        log::debug!("Retrying {}", context_id);
        Some(self.lifecycle.issue(&context, &mut self.store))
    }

    /// Whether `context_id` in `document` still starts with the text its
    /// last request was built from
    ///
    /// Paragraph ids are positions, so inserting or removing a paragraph
    /// above one makes its suggestions belong to different text.
    fn still_matches(&self, context_id: ContextId, document: &str) -> bool {
        let Some(issued) = self.last_issued.get(&context_id) else {
            return true;
        };
        match context_id {
            ContextId::Document => true,
            ContextId::Paragraph(_) => context_text(document, context_id)
                .is_some_and(|current| current.starts_with(issued.text.as_str())),
        }
    }

    fn drop_shifted_contexts(&mut self, document: &str) {
        let shifted: Vec<ContextId> = self
            .last_issued
            .keys()
            .copied()
            .filter(|&context_id| !self.still_matches(context_id, document))
            .collect();

        for context_id in shifted {
            log::debug!("{} changed under its suggestions, dropping them", context_id);
            self.store.clear(context_id);
            self.settle(context_id);
        }
    }

    /// Stop all pending work for a context so nothing can repopulate it
    fn settle(&mut self, context_id: ContextId) {
        self.scheduler.cancel(context_id);
        self.lifecycle.forget(context_id);
        self.detector.forget(context_id);
        self.last_issued.remove(&context_id);
    }

    /// Suggestion set the overlay is showing, if any
    pub fn overlay(&self) -> Option<&SuggestionSet> {
        if self.overlay.is_visible(&self.store) {
            self.overlay.view(&self.store)
        } else {
            None
        }
    }

    pub fn store(&self) -> &SuggestionStore {
        &self.store
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Cancel every timer and request and drop all suggestions
    ///
    /// Results that were already on their way are discarded.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        self.scheduler.cancel_all();
        self.lifecycle.cancel_all();
        self.events.close();
        while self.events.try_recv().is_ok() {}

        self.store.clear_all();
        self.detector.reset();
        self.last_issued.clear();
        self.overlay.set_active(None);
        log::debug!("Suggestion engine shut down");
    }
}

impl Drop for SuggestionEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
