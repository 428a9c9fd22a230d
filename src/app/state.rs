use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders},
};
use tui_textarea::{CursorMove, TextArea};

use crate::engine::SuggestionEngine;

/// Application state
pub struct App {
    pub textarea: TextArea<'static>,
    pub engine: SuggestionEngine,
    /// Name shown in the editor title
    pub title: String,
    pub should_quit: bool,
    /// Editor text area from the last render, used to place the overlay
    pub editor_area: Rect,
}

impl App {
    /// Create the pad with `initial` text and the cursor at the end
    pub fn new(initial: &str, title: impl Into<String>, engine: SuggestionEngine) -> Self {
        let title = title.into();
        let mut app = Self {
            textarea: new_textarea(initial, &title),
            engine,
            title,
            should_quit: false,
            editor_area: Rect::default(),
        };
        app.textarea.move_cursor(CursorMove::Bottom);
        app.textarea.move_cursor(CursorMove::End);
        app
    }

    /// Full document text, lines joined with `\n`
    pub fn document(&self) -> String {
        self.textarea.lines().join("\n")
    }

    /// Cursor as a char offset into [`App::document`]
    pub fn cursor_offset(&self) -> usize {
        let (row, col) = self.textarea.cursor();
        let before: usize = self
            .textarea
            .lines()
            .iter()
            .take(row)
            .map(|line| line.chars().count() + 1)
            .sum();
        before + col
    }

    /// Replace the document and put the cursor at char offset `cursor`
    pub fn set_document(&mut self, text: &str, cursor: usize) {
        self.textarea = new_textarea(text, &self.title);
        let (row, col) = offset_to_position(text, cursor);
        self.textarea.move_cursor(CursorMove::Jump(
            u16::try_from(row).unwrap_or(u16::MAX),
            u16::try_from(col).unwrap_or(u16::MAX),
        ));
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

fn new_textarea(text: &str, title: &str) -> TextArea<'static> {
    let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    let mut textarea = TextArea::new(lines);

    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", title))
            .border_style(Style::default().fg(Color::Cyan)),
    );

    // Remove default underline from cursor line
    textarea.set_cursor_line_style(Style::default());
    textarea
}

/// `(row, col)` of a char offset, clamped to the end of the text
pub(crate) fn offset_to_position(text: &str, offset: usize) -> (usize, usize) {
    let mut remaining = offset;
    let mut lines = text.split('\n').peekable();
    let mut row = 0;

    while let Some(line) = lines.next() {
        let len = line.chars().count();
        if remaining <= len || lines.peek().is_none() {
            return (row, remaining.min(len));
        }
        remaining -= len + 1;
        row += 1;
    }
    (0, 0)
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
