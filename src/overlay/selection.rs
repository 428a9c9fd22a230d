//! Selection movement for the suggestion overlay

/// Direction of an overlay navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Index reached by moving one step from `current` over `count` items
///
/// Wraps from the last item to the first and from the first to the last.
/// With no items the index stays at 0.
pub fn step(current: usize, count: usize, direction: Direction) -> usize {
    if count == 0 {
        return 0;
    }
    let current = current.min(count - 1);

    match direction {
        Direction::Next => (current + 1) % count,
        Direction::Previous => {
            if current == 0 {
                count - 1
            } else {
                current - 1
            }
        }
    }
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod selection_tests;
