//! Overlay rendering
//!
//! Builds the suggestion list as ratatui lines and draws it in a bordered
//! popup next to the cursor.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::keybindings::MAX_DIRECT_SELECTION;
use super::layout::{self, HORIZONTAL_CHROME};
use crate::store::{SuggestionSet, SuggestionStatus};
use crate::suggestion::SuggestionItem;

pub const LOADING_TEXT: &str = "Thinking…";
pub const ERROR_TEXT: &str = "No suggestions available · Tab to retry";

const SELECTED_BG: Color = Color::DarkGray;

/// Wrap text to `max_width` display columns, breaking on whitespace
///
/// Words wider than the line are split at character boundaries. Always
/// returns at least one line.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        let sep = usize::from(!current.is_empty());

        if current_width + sep + word_width <= max_width {
            if sep == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_width += sep + word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= max_width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        for c in word.chars() {
            let w = c.width().unwrap_or(0);
            if current_width + w > max_width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(c);
            current_width += w;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Confidence as three dots, filled by level
fn confidence_marker(item: &SuggestionItem) -> String {
    let level = item.confidence_level() as usize;
    format!("{}{}", "●".repeat(level), "○".repeat(3 - level))
}

fn item_lines(
    index: usize,
    item: &SuggestionItem,
    is_selected: bool,
    width: u16,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let type_label = item.type_tag.label();
    let has_selection_number = index < MAX_DIRECT_SELECTION;

    let prefix = if has_selection_number {
        format!("{}. {} ", index + 1, type_label)
    } else {
        format!("{} ", type_label)
    };
    let prefix_width = prefix.width();

    let marker = confidence_marker(item);
    let text_width = (width as usize).saturating_sub(prefix_width + marker.width() + 1);
    let text_lines = wrap_text(&item.text, text_width);

    let base = if is_selected {
        Style::default().bg(SELECTED_BG)
    } else {
        Style::default()
    };

    if let Some(first) = text_lines.first() {
        let mut spans = Vec::new();

        if has_selection_number {
            let fg = if is_selected { Color::Black } else { Color::DarkGray };
            spans.push(Span::styled(format!("{}. ", index + 1), base.fg(fg)));
        }

        spans.push(Span::styled(
            type_label.to_string(),
            base.fg(item.type_tag.color()).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(" ", base));
        spans.push(Span::styled(first.clone(), base.fg(Color::White)));
        spans.push(Span::styled(" ", base));
        spans.push(Span::styled(marker, base.fg(Color::DarkGray)));

        lines.push(Line::from(spans));
    }

    let indent = " ".repeat(prefix_width);
    for rest in text_lines.iter().skip(1) {
        lines.push(Line::from(Span::styled(
            format!("{}{}", indent, rest),
            base.fg(Color::White),
        )));
    }

    lines
}

/// Build the overlay content for a suggestion set
///
/// `width` is the content width inside the borders. Idle sets and Ready
/// sets without items render nothing.
pub fn build_overlay_lines(set: &SuggestionSet, width: u16) -> Vec<Line<'static>> {
    match set.status {
        SuggestionStatus::Idle => Vec::new(),
        SuggestionStatus::Loading => vec![Line::from(Span::styled(
            LOADING_TEXT,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ))],
        SuggestionStatus::Error => wrap_text(ERROR_TEXT, width as usize)
            .into_iter()
            .map(|line| Line::from(Span::styled(line, Style::default().fg(Color::DarkGray))))
            .collect(),
        SuggestionStatus::Ready => set
            .items
            .iter()
            .enumerate()
            .flat_map(|(i, item)| item_lines(i, item, i == set.selected_index, width))
            .collect(),
    }
}

fn hints(set: &SuggestionSet) -> Line<'static> {
    let text = match set.status {
        SuggestionStatus::Ready => " Tab accept | ↑↓ select | Alt+1-5 | Esc dismiss ",
        SuggestionStatus::Error => " Tab retry | Esc dismiss ",
        _ => " Esc dismiss ",
    };
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

/// Draw the overlay for `set` near the cursor
///
/// Returns the area drawn, or `None` when nothing is shown or the editor is
/// too small.
pub fn render_overlay(
    frame: &mut Frame,
    set: &SuggestionSet,
    editor_area: Rect,
    cursor: (u16, u16),
) -> Option<Rect> {
    let width = layout::overlay_width(editor_area)?;
    let lines = build_overlay_lines(set, width.saturating_sub(HORIZONTAL_CHROME));
    if lines.is_empty() {
        return None;
    }

    let area = layout::overlay_area(editor_area, cursor, lines.len() as u16)?;

    let title = Line::from(vec![
        Span::raw(" "),
        Span::styled(
            "Suggestions",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_bottom(hints(set).alignment(Alignment::Center))
        .border_style(Style::default().fg(Color::Green))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(area);
    let content = Rect {
        x: inner.x + 1,
        width: inner.width.saturating_sub(2),
        ..inner
    };

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(lines), content);

    Some(area)
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
