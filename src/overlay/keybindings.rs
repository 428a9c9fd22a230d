//! Keyboard handling for the suggestion overlay
//!
//! Keys are only claimed while the overlay has something to act on, so
//! ordinary editing keystrokes pass through untouched otherwise.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::selection::Direction;
use crate::store::{SuggestionSet, SuggestionStatus};

/// Number of suggestions reachable with Alt+1..Alt+N
pub const MAX_DIRECT_SELECTION: usize = 5;

/// What a key press asks the overlay to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    /// Accept the item at the index, or the selected one when `None`
    Accept(Option<usize>),
    Reject,
    Navigate(Direction),
    /// Re-issue the request after an error
    Retry,
}

/// Map a key press to an overlay action for the given set
///
/// - Ready with items: Tab accepts, Esc rejects, Up/Down navigate,
///   Alt+1..5 accept directly
/// - Loading: only Esc (dismiss)
/// - Error: Esc dismisses, Tab retries
/// - Otherwise nothing is claimed
pub fn overlay_action(key: KeyEvent, set: Option<&SuggestionSet>) -> Option<OverlayAction> {
    let set = set?;

    match set.status {
        SuggestionStatus::Idle => None,
        SuggestionStatus::Loading => match key.code {
            KeyCode::Esc if key.modifiers.is_empty() => Some(OverlayAction::Reject),
            _ => None,
        },
        SuggestionStatus::Error => match key.code {
            KeyCode::Esc if key.modifiers.is_empty() => Some(OverlayAction::Reject),
            KeyCode::Tab if key.modifiers.is_empty() => Some(OverlayAction::Retry),
            _ => None,
        },
        SuggestionStatus::Ready if set.items.is_empty() => None,
        SuggestionStatus::Ready => {
            if let Some(index) = handle_direct_selection(key, set.items.len()) {
                return Some(OverlayAction::Accept(Some(index)));
            }
            if !key.modifiers.is_empty() {
                return None;
            }
            match key.code {
                KeyCode::Tab => Some(OverlayAction::Accept(None)),
                KeyCode::Esc => Some(OverlayAction::Reject),
                KeyCode::Up => Some(OverlayAction::Navigate(Direction::Previous)),
                KeyCode::Down => Some(OverlayAction::Navigate(Direction::Next)),
                _ => None,
            }
        }
    }
}

/// Handle Alt+1 through Alt+5 for direct suggestion selection
///
/// Returns the zero-based index if it refers to an existing suggestion.
pub fn handle_direct_selection(key: KeyEvent, suggestion_count: usize) -> Option<usize> {
    if !key.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }

    let index = match key.code {
        KeyCode::Char(c @ '1'..='9') => c.to_digit(10)? as usize - 1,
        _ => return None,
    };

    if index < MAX_DIRECT_SELECTION && index < suggestion_count {
        Some(index)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "keybindings_tests.rs"]
mod keybindings_tests;
