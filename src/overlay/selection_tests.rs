//! Tests for overlay selection movement

use super::*;
use proptest::prelude::*;

#[test]
fn test_next_advances() {
    assert_eq!(step(0, 3, Direction::Next), 1);
    assert_eq!(step(1, 3, Direction::Next), 2);
}

#[test]
fn test_next_wraps_to_first() {
    assert_eq!(step(2, 3, Direction::Next), 0);
}

#[test]
fn test_previous_wraps_to_last() {
    assert_eq!(step(0, 3, Direction::Previous), 2);
}

#[test]
fn test_previous_moves_back() {
    assert_eq!(step(2, 3, Direction::Previous), 1);
}

#[test]
fn test_single_item_stays_put() {
    assert_eq!(step(0, 1, Direction::Next), 0);
    assert_eq!(step(0, 1, Direction::Previous), 0);
}

#[test]
fn test_no_items() {
    assert_eq!(step(0, 0, Direction::Next), 0);
    assert_eq!(step(4, 0, Direction::Previous), 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // N steps forward visit every index once and return to the start
    #[test]
    fn prop_next_cycles_through_all(count in 1usize..20, start in 0usize..20) {
        let start = start % count;
        let mut index = start;
        let mut visited = vec![false; count];

        for expected in (0..count).map(|i| (start + i) % count) {
            prop_assert_eq!(index, expected);
            visited[index] = true;
            index = step(index, count, Direction::Next);
        }

        prop_assert_eq!(index, start);
        prop_assert!(visited.iter().all(|v| *v));
    }

    // Previous undoes next
    #[test]
    fn prop_previous_inverts_next(count in 1usize..20, start in 0usize..20) {
        let start = start % count;
        let forward = step(start, count, Direction::Next);
        prop_assert_eq!(step(forward, count, Direction::Previous), start);
    }

    // The result is always a valid index
    #[test]
    fn prop_step_stays_in_range(count in 1usize..50, current in 0usize..100, next in prop::bool::ANY) {
        let direction = if next { Direction::Next } else { Direction::Previous };
        prop_assert!(step(current, count, direction) < count);
    }
}
