//! Overlay positioning
//!
//! The overlay opens just below the cursor line and flips above it when
//! the editor has no room underneath.

use ratatui::layout::Rect;

/// Minimum width for the overlay to stay readable
pub const OVERLAY_MIN_WIDTH: u16 = 24;
/// Preferred width cap as a percentage of the editor width
const MAX_WIDTH_PERCENT: u16 = 80;
/// Absolute width cap
const MAX_WIDTH: u16 = 72;
/// Border height (top + bottom)
pub const BORDER_HEIGHT: u16 = 2;
/// Border width (left + right) plus one column of padding each side
pub const HORIZONTAL_CHROME: u16 = 4;

/// Overlay width for an editor area, or `None` when it cannot fit
pub fn overlay_width(editor_area: Rect) -> Option<u16> {
    // Widened so very wide terminals don't overflow
    let preferred = u32::from(editor_area.width) * u32::from(MAX_WIDTH_PERCENT) / 100;
    let preferred = u16::try_from(preferred).unwrap_or(u16::MAX);
    let width = preferred.clamp(OVERLAY_MIN_WIDTH, MAX_WIDTH).min(editor_area.width);
    if width < OVERLAY_MIN_WIDTH {
        None
    } else {
        Some(width)
    }
}

/// Calculate where to draw the overlay
///
/// # Arguments
/// * `editor_area` - Area of the text editor on screen
/// * `cursor` - Screen position `(x, y)` of the cursor
/// * `content_height` - Rendered content lines, excluding borders
///
/// # Returns
/// A `Rect` inside `editor_area`, or `None` if there's not enough space
pub fn overlay_area(editor_area: Rect, cursor: (u16, u16), content_height: u16) -> Option<Rect> {
    if editor_area.height == 0 {
        return None;
    }
    let width = overlay_width(editor_area)?;
    let wanted = content_height.saturating_add(BORDER_HEIGHT);

    let (cursor_x, cursor_y) = cursor;
    let top = editor_area.y;
    let bottom = editor_area.y.saturating_add(editor_area.height);
    let cursor_y = cursor_y.clamp(top, bottom.saturating_sub(1));

    let space_below = bottom.saturating_sub(cursor_y + 1);
    let space_above = cursor_y.saturating_sub(top);

    let (y, height) = if space_below >= wanted || space_below >= space_above {
        (cursor_y + 1, wanted.min(space_below))
    } else {
        let height = wanted.min(space_above);
        (cursor_y - height, height)
    };

    if height < BORDER_HEIGHT + 1 {
        return None;
    }

    // Keep the overlay's left edge near the cursor without running off the right
    let max_x = editor_area.x.saturating_add(editor_area.width - width);
    let x = cursor_x.clamp(editor_area.x, max_x);

    Some(Rect {
        x,
        y,
        width,
        height,
    })
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod layout_tests;
