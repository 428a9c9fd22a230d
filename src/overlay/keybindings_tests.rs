//! Tests for overlay keybindings

use super::*;
use crate::context::ContextId;
use crate::test_utils::test_helpers::items;
use proptest::prelude::*;

// Helper to create key events
fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn key_with_mods(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

fn set(status: SuggestionStatus, count: usize) -> SuggestionSet {
    let texts: Vec<String> = (0..count).map(|i| format!("option {}", i)).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    SuggestionSet {
        items: items(&refs),
        status,
        ..SuggestionSet::new(ContextId::Document)
    }
}

// =========================================================================
// Ready overlay
// =========================================================================

#[test]
fn test_tab_accepts_selected() {
    let ready = set(SuggestionStatus::Ready, 3);
    assert_eq!(
        overlay_action(key(KeyCode::Tab), Some(&ready)),
        Some(OverlayAction::Accept(None))
    );
}

#[test]
fn test_esc_rejects() {
    let ready = set(SuggestionStatus::Ready, 3);
    assert_eq!(
        overlay_action(key(KeyCode::Esc), Some(&ready)),
        Some(OverlayAction::Reject)
    );
}

#[test]
fn test_arrows_navigate() {
    let ready = set(SuggestionStatus::Ready, 3);
    assert_eq!(
        overlay_action(key(KeyCode::Up), Some(&ready)),
        Some(OverlayAction::Navigate(Direction::Previous))
    );
    assert_eq!(
        overlay_action(key(KeyCode::Down), Some(&ready)),
        Some(OverlayAction::Navigate(Direction::Next))
    );
}

#[test]
fn test_typing_passes_through() {
    let ready = set(SuggestionStatus::Ready, 3);
    for code in [
        KeyCode::Char('a'),
        KeyCode::Char(' '),
        KeyCode::Enter,
        KeyCode::Backspace,
        KeyCode::Left,
        KeyCode::Right,
    ] {
        assert_eq!(overlay_action(key(code), Some(&ready)), None);
    }
}

#[test]
fn test_modified_arrows_pass_through() {
    let ready = set(SuggestionStatus::Ready, 3);
    assert_eq!(
        overlay_action(key_with_mods(KeyCode::Up, KeyModifiers::SHIFT), Some(&ready)),
        None
    );
    assert_eq!(
        overlay_action(key_with_mods(KeyCode::Tab, KeyModifiers::CONTROL), Some(&ready)),
        None
    );
}

#[test]
fn test_alt_digit_accepts_directly() {
    let ready = set(SuggestionStatus::Ready, 3);
    assert_eq!(
        overlay_action(key_with_mods(KeyCode::Char('2'), KeyModifiers::ALT), Some(&ready)),
        Some(OverlayAction::Accept(Some(1)))
    );
    assert_eq!(
        overlay_action(key_with_mods(KeyCode::Char('4'), KeyModifiers::ALT), Some(&ready)),
        None
    );
}

// =========================================================================
// Hidden, loading and error overlays
// =========================================================================

#[test]
fn test_no_overlay_claims_nothing() {
    for code in [KeyCode::Tab, KeyCode::Esc, KeyCode::Up, KeyCode::Down] {
        assert_eq!(overlay_action(key(code), None), None);
    }
}

#[test]
fn test_idle_and_empty_ready_claim_nothing() {
    let idle = set(SuggestionStatus::Idle, 0);
    let empty = set(SuggestionStatus::Ready, 0);
    for code in [KeyCode::Tab, KeyCode::Esc, KeyCode::Up, KeyCode::Down] {
        assert_eq!(overlay_action(key(code), Some(&idle)), None);
        assert_eq!(overlay_action(key(code), Some(&empty)), None);
    }
}

#[test]
fn test_loading_only_claims_escape() {
    let loading = set(SuggestionStatus::Loading, 0);
    assert_eq!(
        overlay_action(key(KeyCode::Esc), Some(&loading)),
        Some(OverlayAction::Reject)
    );
    assert_eq!(overlay_action(key(KeyCode::Tab), Some(&loading)), None);
    assert_eq!(overlay_action(key(KeyCode::Down), Some(&loading)), None);
}

#[test]
fn test_error_tab_retries() {
    let error = set(SuggestionStatus::Error, 0);
    assert_eq!(
        overlay_action(key(KeyCode::Tab), Some(&error)),
        Some(OverlayAction::Retry)
    );
    assert_eq!(
        overlay_action(key(KeyCode::Esc), Some(&error)),
        Some(OverlayAction::Reject)
    );
    assert_eq!(overlay_action(key(KeyCode::Up), Some(&error)), None);
}

// =========================================================================
// Unit Tests for handle_direct_selection
// =========================================================================

#[test]
fn test_alt_1_selects_first_suggestion() {
    let result = handle_direct_selection(key_with_mods(KeyCode::Char('1'), KeyModifiers::ALT), 3);
    assert_eq!(result, Some(0));
}

#[test]
fn test_alt_5_selects_fifth_suggestion() {
    let result = handle_direct_selection(key_with_mods(KeyCode::Char('5'), KeyModifiers::ALT), 5);
    assert_eq!(result, Some(4));
}

#[test]
fn test_alt_6_not_handled() {
    let result = handle_direct_selection(key_with_mods(KeyCode::Char('6'), KeyModifiers::ALT), 10);
    assert_eq!(result, None);
}

#[test]
fn test_plain_digit_not_handled() {
    let result = handle_direct_selection(key(KeyCode::Char('1')), 5);
    assert_eq!(result, None);
}

#[test]
fn test_alt_0_not_handled() {
    let result = handle_direct_selection(key_with_mods(KeyCode::Char('0'), KeyModifiers::ALT), 5);
    assert_eq!(result, None);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Printable characters never get swallowed by a visible overlay
    #[test]
    fn prop_plain_chars_never_claimed(
        c in prop::char::range(' ', '~'),
        count in 0usize..6,
        status in prop::sample::select(vec![
            SuggestionStatus::Idle,
            SuggestionStatus::Loading,
            SuggestionStatus::Ready,
            SuggestionStatus::Error,
        ]),
    ) {
        let set = set(status, count);
        prop_assert_eq!(overlay_action(key(KeyCode::Char(c)), Some(&set)), None);
    }
}
