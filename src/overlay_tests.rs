//! Tests for the overlay controller

use super::*;
use crate::test_utils::test_helpers::items;
use chrono::Utc;
use proptest::prelude::*;

const CTX: ContextId = ContextId::Paragraph(0);

fn ready_store(texts: &[&str]) -> SuggestionStore {
    let mut store = SuggestionStore::new();
    store.upsert(CTX, SetUpdate::loading()).unwrap();
    store.upsert(CTX, SetUpdate::ready(items(texts), Utc::now())).unwrap();
    store
}

fn controller() -> OverlayController {
    let mut overlay = OverlayController::new();
    overlay.set_active(Some(CTX));
    overlay
}

// =========================================================================
// Visibility
// =========================================================================

#[test]
fn test_hidden_without_active_context() {
    let store = ready_store(&["a", "b"]);
    let overlay = OverlayController::new();
    assert!(!overlay.is_visible(&store));
    assert!(overlay.view(&store).is_none());
}

#[test]
fn test_visible_when_ready_with_items() {
    let store = ready_store(&["a"]);
    assert!(controller().is_visible(&store));
}

#[test]
fn test_hidden_when_ready_but_empty() {
    let store = ready_store(&[]);
    assert!(!controller().is_visible(&store));
}

#[test]
fn test_visible_while_loading_and_on_error() {
    let mut store = SuggestionStore::new();
    store.upsert(CTX, SetUpdate::loading()).unwrap();
    assert!(controller().is_visible(&store));

    store.upsert(CTX, SetUpdate::error(Utc::now())).unwrap();
    assert!(controller().is_visible(&store));
}

#[test]
fn test_shows_only_active_context() {
    let store = ready_store(&["a"]);
    let mut overlay = OverlayController::new();
    overlay.set_active(Some(ContextId::Paragraph(1)));
    assert!(!overlay.is_visible(&store));
}

// =========================================================================
// Navigation
// =========================================================================

#[test]
fn test_navigate_previous_wraps_to_last() {
    let mut store = ready_store(&["a", "b", "c"]);
    let selected = controller().navigate(&mut store, Direction::Previous);
    assert_eq!(selected, Some(2));
    assert_eq!(store.get(CTX).unwrap().selected_index, 2);
}

#[test]
fn test_navigate_next_wraps_to_first() {
    let mut store = ready_store(&["a", "b", "c"]);
    let overlay = controller();
    overlay.navigate(&mut store, Direction::Next);
    overlay.navigate(&mut store, Direction::Next);
    assert_eq!(overlay.navigate(&mut store, Direction::Next), Some(0));
}

#[test]
fn test_navigate_without_choices_does_nothing() {
    let mut store = SuggestionStore::new();
    store.upsert(CTX, SetUpdate::loading()).unwrap();
    assert_eq!(controller().navigate(&mut store, Direction::Next), None);
}

// =========================================================================
// Accept / Reject
// =========================================================================

#[test]
fn test_accept_selected_clears_set() {
    let mut store = ready_store(&["a", "b", "c"]);
    let overlay = controller();
    overlay.navigate(&mut store, Direction::Next);

    let accepted = overlay.accept(&mut store, None).unwrap();
    assert_eq!(accepted.context_id, CTX);
    assert_eq!(accepted.item.text, "b");
    assert!(store.get(CTX).is_none());
    assert_eq!(store.status(CTX), SuggestionStatus::Idle);
}

#[test]
fn test_accept_by_index() {
    let mut store = ready_store(&["a", "b", "c"]);
    let accepted = controller().accept(&mut store, Some(2)).unwrap();
    assert_eq!(accepted.item.text, "c");
    assert!(store.get(CTX).is_none());
}

#[test]
fn test_accept_out_of_range_leaves_set() {
    let mut store = ready_store(&["a", "b"]);
    assert_eq!(controller().accept(&mut store, Some(5)), None);

    let set = store.get(CTX).unwrap();
    assert_eq!(set.status, SuggestionStatus::Ready);
    assert_eq!(set.items.len(), 2);
}

#[test]
fn test_accept_while_loading_returns_none() {
    let mut store = SuggestionStore::new();
    store.upsert(CTX, SetUpdate::loading()).unwrap();
    assert_eq!(controller().accept(&mut store, None), None);
    assert_eq!(store.status(CTX), SuggestionStatus::Loading);
}

#[test]
fn test_reject_clears_without_item() {
    let mut store = ready_store(&["a"]);
    assert!(controller().reject(&mut store));
    assert!(store.get(CTX).is_none());
}

#[test]
fn test_reject_leaves_other_contexts() {
    let mut store = ready_store(&["a"]);
    let other = ContextId::Paragraph(3);
    store.upsert(other, SetUpdate::loading()).unwrap();

    controller().reject(&mut store);
    assert_eq!(store.status(other), SuggestionStatus::Loading);
}

#[test]
fn test_reject_nothing_to_clear() {
    let mut store = SuggestionStore::new();
    assert!(!controller().reject(&mut store));
    assert!(!OverlayController::new().reject(&mut store));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Whatever the selection, accepting leaves the context empty
    #[test]
    fn prop_accept_always_clears(count in 1usize..8, moves in prop::collection::vec(any::<bool>(), 0..20)) {
        let texts: Vec<String> = (0..count).map(|i| format!("s{}", i)).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let mut store = ready_store(&refs);
        let overlay = controller();

        for next in moves {
            let direction = if next { Direction::Next } else { Direction::Previous };
            overlay.navigate(&mut store, direction);
        }

        prop_assert!(overlay.accept(&mut store, None).is_some());
        prop_assert!(store.get(CTX).is_none());
    }
}
