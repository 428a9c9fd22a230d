//! Overlay presentation controller
//!
//! Presents the active context's suggestion set and turns user actions
//! (navigate, accept, reject) into store updates. The overlay is visible
//! while the active context is Loading, Error, or Ready with items.

use crate::context::ContextId;
use crate::store::{SetUpdate, SuggestionSet, SuggestionStatus, SuggestionStore};
use crate::suggestion::SuggestionItem;

pub mod keybindings;
pub mod layout;
pub mod render;
pub mod selection;

pub use keybindings::{OverlayAction, overlay_action};
pub use selection::Direction;

/// An item the user accepted, with the context it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedSuggestion {
    pub context_id: ContextId,
    pub item: SuggestionItem,
}

/// Tracks which context the overlay is showing
#[derive(Debug, Clone, Default)]
pub struct OverlayController {
    active: Option<ContextId>,
}

impl OverlayController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<ContextId> {
        self.active
    }

    pub fn set_active(&mut self, context_id: Option<ContextId>) {
        self.active = context_id;
    }

    /// Suggestion set of the active context, if any
    pub fn view<'a>(&self, store: &'a SuggestionStore) -> Option<&'a SuggestionSet> {
        self.active.and_then(|id| store.get(id))
    }

    pub fn is_visible(&self, store: &SuggestionStore) -> bool {
        self.view(store).is_some_and(|set| match set.status {
            SuggestionStatus::Idle => false,
            SuggestionStatus::Loading | SuggestionStatus::Error => true,
            SuggestionStatus::Ready => !set.items.is_empty(),
        })
    }

    /// Move the selection with wraparound, returning the new index
    pub fn navigate(&self, store: &mut SuggestionStore, direction: Direction) -> Option<usize> {
        let set = self.view(store)?;
        if !set.has_choices() {
            return None;
        }
        let context_id = set.context_id;
        let next = selection::step(set.selected_index, set.items.len(), direction);

        match store.upsert(context_id, SetUpdate::select(next)) {
            Ok(set) => Some(set.selected_index),
            Err(e) => {
                log::warn!("Navigation failed for {}: {}", context_id, e);
                None
            }
        }
    }

    /// Resolve the item at `index` (default: the selected one) and clear
    /// the active set
    ///
    /// An out-of-range index resolves nothing and leaves the set as it was.
    pub fn accept(
        &self,
        store: &mut SuggestionStore,
        index: Option<usize>,
    ) -> Option<AcceptedSuggestion> {
        let set = self.view(store)?;
        if !set.has_choices() {
            return None;
        }
        let context_id = set.context_id;
        let index = index.unwrap_or(set.selected_index);
        let item = set.items.get(index)?.clone();

        store.clear(context_id);
        log::debug!("Accepted suggestion {} for {}", index, context_id);

        Some(AcceptedSuggestion { context_id, item })
    }

    /// Clear the active set without resolving anything
    pub fn reject(&self, store: &mut SuggestionStore) -> bool {
        match self.active {
            Some(context_id) => {
                let cleared = store.clear(context_id).is_some();
                if cleared {
                    log::debug!("Rejected suggestions for {}", context_id);
                }
                cleared
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "overlay_tests.rs"]
mod overlay_tests;
