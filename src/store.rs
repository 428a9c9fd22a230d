//! Suggestion store
//!
//! The single owner of per-context suggestion state. Every read and write of
//! a [`SuggestionSet`] goes through [`SuggestionStore`]; contexts never share
//! state, so keying alone isolates them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::context::ContextId;
use crate::suggestion::SuggestionItem;

/// Where a context is in its request cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuggestionStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

impl SuggestionStatus {
    /// Whether moving from `self` to `next` is a legal transition
    ///
    /// Idle → Loading → Ready|Error, and Ready|Error → Loading on re-fetch.
    /// Loading → Loading covers an edit arriving while a request is in flight.
    /// Returning to Idle happens only by clearing the set.
    pub fn can_transition_to(self, next: SuggestionStatus) -> bool {
        use SuggestionStatus::*;
        matches!(
            (self, next),
            (Idle, Loading)
                | (Loading, Loading)
                | (Loading, Ready)
                | (Loading, Error)
                | (Ready, Loading)
                | (Error, Loading)
        )
    }
}

/// Errors from invalid store updates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("invalid status transition {from:?} -> {to:?}")]
    InvalidTransition {
        from: SuggestionStatus,
        to: SuggestionStatus,
    },

    #[error("selection {index} out of range for {len} suggestions")]
    SelectionOutOfRange { index: usize, len: usize },
}

/// Current suggestions for one context
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionSet {
    pub context_id: ContextId,
    pub items: Vec<SuggestionItem>,
    pub status: SuggestionStatus,
    /// Only meaningful while `items` is non-empty
    pub selected_index: usize,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl SuggestionSet {
    pub fn new(context_id: ContextId) -> Self {
        Self {
            context_id,
            items: Vec::new(),
            status: SuggestionStatus::Idle,
            selected_index: 0,
            fetched_at: None,
        }
    }

    pub fn selected_item(&self) -> Option<&SuggestionItem> {
        self.items.get(self.selected_index)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ready with at least one item to choose from
    pub fn has_choices(&self) -> bool {
        self.status == SuggestionStatus::Ready && !self.items.is_empty()
    }
}

/// Partial update applied by [`SuggestionStore::upsert`]
///
/// Unset fields are left alone. Replacing `items` resets the selection to
/// the first item unless `selected_index` is also given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetUpdate {
    pub status: Option<SuggestionStatus>,
    pub items: Option<Vec<SuggestionItem>>,
    pub selected_index: Option<usize>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl SetUpdate {
    /// Request issued: Loading, previous items dropped
    pub fn loading() -> Self {
        Self {
            status: Some(SuggestionStatus::Loading),
            items: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// Request resolved with items
    pub fn ready(items: Vec<SuggestionItem>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            status: Some(SuggestionStatus::Ready),
            items: Some(items),
            fetched_at: Some(fetched_at),
            ..Self::default()
        }
    }

    /// Request failed: Error with no items
    pub fn error(fetched_at: DateTime<Utc>) -> Self {
        Self {
            status: Some(SuggestionStatus::Error),
            items: Some(Vec::new()),
            fetched_at: Some(fetched_at),
            ..Self::default()
        }
    }

    /// Move the selection
    pub fn select(index: usize) -> Self {
        Self {
            selected_index: Some(index),
            ..Self::default()
        }
    }
}

/// Keyed map from context to its suggestion set
#[derive(Debug, Default)]
pub struct SuggestionStore {
    sets: HashMap<ContextId, SuggestionSet>,
}

impl SuggestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, context_id: ContextId) -> Option<&SuggestionSet> {
        self.sets.get(&context_id)
    }

    /// Status of a context; absent contexts are Idle
    pub fn status(&self, context_id: ContextId) -> SuggestionStatus {
        self.sets
            .get(&context_id)
            .map(|set| set.status)
            .unwrap_or_default()
    }

    /// Apply `update` to the set for `context_id`, creating it if needed
    ///
    /// The update is validated as a whole before anything changes, so a
    /// rejected update leaves the store untouched.
    pub fn upsert(
        &mut self,
        context_id: ContextId,
        update: SetUpdate,
    ) -> Result<&SuggestionSet, StoreError> {
        let existing = self.sets.get(&context_id);
        let current_status = existing.map(|set| set.status).unwrap_or_default();

        if let Some(next) = update.status
            && !current_status.can_transition_to(next)
        {
            return Err(StoreError::InvalidTransition {
                from: current_status,
                to: next,
            });
        }

        if let Some(index) = update.selected_index {
            let len = match &update.items {
                Some(items) => items.len(),
                None => existing.map(|set| set.items.len()).unwrap_or(0),
            };
            if index >= len {
                return Err(StoreError::SelectionOutOfRange { index, len });
            }
        }

        let set = self
            .sets
            .entry(context_id)
            .or_insert_with(|| SuggestionSet::new(context_id));

        if let Some(items) = update.items {
            set.items = items;
            set.selected_index = 0;
        }
        if let Some(status) = update.status {
            set.status = status;
        }
        if let Some(index) = update.selected_index {
            set.selected_index = index;
        }
        if let Some(fetched_at) = update.fetched_at {
            set.fetched_at = Some(fetched_at);
        }

        Ok(set)
    }

    /// Remove the set for `context_id`, returning it to Idle
    pub fn clear(&mut self, context_id: ContextId) -> Option<SuggestionSet> {
        self.sets.remove(&context_id)
    }

    pub fn clear_all(&mut self) {
        self.sets.clear();
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn context_ids(&self) -> impl Iterator<Item = ContextId> + '_ {
        self.sets.keys().copied()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
