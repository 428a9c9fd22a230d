//! Request lifecycle management
//!
//! Issues suggestion requests and decides which responses are allowed to
//! touch the store. Every issuance for a context takes the next token for
//! that context; only the response carrying the latest token is committed
//! (last-issued-wins), however the network reorders replies.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::context::{ContextId, EditContext};
use crate::events::{EngineEvent, Resolved};
use crate::service::{ServiceRequest, SuggestionService};
use crate::store::{SetUpdate, SuggestionStatus, SuggestionStore};

/// A request as issued, kept for logging and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub context_id: ContextId,
    pub text: String,
    pub cursor: usize,
    pub token: u64,
    pub issued_at: DateTime<Utc>,
}

/// What [`RequestLifecycle::resolve`] did with a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Token was current; the set moved to this status
    Committed(SuggestionStatus),
    /// Token was superseded or the context was cleared; nothing changed
    Stale,
}

struct InFlight {
    token: u64,
    cancel: CancellationToken,
}

/// Identity sent along with every request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestIdentity {
    pub user_id: String,
    pub session_id: String,
}

pub struct RequestLifecycle {
    service: Arc<dyn SuggestionService>,
    identity: RequestIdentity,
    max_suggestions: usize,
    /// Last token handed out per context; never reset, so a token is never
    /// reused for the same context
    last_token: HashMap<ContextId, u64>,
    in_flight: HashMap<ContextId, InFlight>,
    event_tx: UnboundedSender<EngineEvent>,
}

impl RequestLifecycle {
    pub fn new(
        service: Arc<dyn SuggestionService>,
        identity: RequestIdentity,
        max_suggestions: usize,
        event_tx: UnboundedSender<EngineEvent>,
    ) -> Self {
        Self {
            service,
            identity,
            max_suggestions,
            last_token: HashMap::new(),
            in_flight: HashMap::new(),
            event_tx,
        }
    }

    /// Issue a request for `context`
    ///
    /// Aborts the previous in-flight request for the same context, marks
    /// the set Loading and spawns the fetch. The result arrives later as
    /// [`EngineEvent::Resolved`]. Must be called from within a tokio runtime.
    pub fn issue(&mut self, context: &EditContext, store: &mut SuggestionStore) -> SuggestionRequest {
        let context_id = context.context_id;

        let token = self.last_token.entry(context_id).or_insert(0);
        *token = token.wrapping_add(1);
        let token = *token;

        if let Some(previous) = self.in_flight.remove(&context_id) {
            previous.cancel.cancel();
            log::debug!(
                "Superseded request {} for {} with {}",
                previous.token,
                context_id,
                token
            );
        }

        if let Err(e) = store.upsert(context_id, SetUpdate::loading()) {
            log::warn!("Could not mark {} as loading: {}", context_id, e);
        }

        let cancel = CancellationToken::new();
        self.in_flight.insert(
            context_id,
            InFlight {
                token,
                cancel: cancel.clone(),
            },
        );

        let fetch = self.service.request_suggestions(ServiceRequest {
            user_id: self.identity.user_id.clone(),
            session_id: self.identity.session_id.clone(),
            context_id,
            text: context.text.clone(),
            cursor: context.cursor,
        });
        let event_tx = self.event_tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                // Dropping `fetch` here aborts the underlying call
                _ = cancel.cancelled() => {
                    log::debug!("Aborted request {} for {}", token, context_id);
                }
                outcome = fetch => {
                    let _ = event_tx.send(EngineEvent::Resolved(Resolved {
                        context_id,
                        token,
                        outcome,
                    }));
                }
            }
        });

        SuggestionRequest {
            context_id,
            text: context.text.clone(),
            cursor: context.cursor,
            token,
            issued_at: Utc::now(),
        }
    }

    /// Apply a finished request to the store if its token is still current
    ///
    /// Transport failures become Error status with no items. Superseded
    /// responses are dropped silently.
    pub fn resolve(&mut self, resolved: Resolved, store: &mut SuggestionStore) -> Resolution {
        let Resolved {
            context_id,
            token,
            outcome,
        } = resolved;

        match self.in_flight.get(&context_id) {
            Some(current) if current.token == token => {
                self.in_flight.remove(&context_id);
            }
            _ => {
                log::debug!("Discarding stale response {} for {}", token, context_id);
                return Resolution::Stale;
            }
        }

        let now = Utc::now();
        let update = match outcome {
            Ok(response) => {
                let items = response
                    .suggestions
                    .into_iter()
                    .filter(|item| !item.text.trim().is_empty())
                    .take(self.max_suggestions)
                    .collect();
                SetUpdate::ready(items, now)
            }
            Err(e) => {
                log::warn!("Suggestion request for {} failed: {}", context_id, e);
                SetUpdate::error(now)
            }
        };

        match store.upsert(context_id, update) {
            Ok(set) => Resolution::Committed(set.status),
            Err(e) => {
                log::warn!("Dropping response for {}: {}", context_id, e);
                Resolution::Stale
            }
        }
    }

    /// Latest token issued for `context_id` (0 if none yet)
    pub fn current_token(&self, context_id: ContextId) -> u64 {
        self.last_token.get(&context_id).copied().unwrap_or(0)
    }

    pub fn is_in_flight(&self, context_id: ContextId) -> bool {
        self.in_flight.contains_key(&context_id)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Abort the request for `context_id` so its response can never land
    pub fn forget(&mut self, context_id: ContextId) -> bool {
        match self.in_flight.remove(&context_id) {
            Some(in_flight) => {
                in_flight.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Abort every in-flight request
    pub fn cancel_all(&mut self) {
        for (_, in_flight) in self.in_flight.drain() {
            in_flight.cancel.cancel();
        }
    }
}

impl Drop for RequestLifecycle {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod lifecycle_tests;
