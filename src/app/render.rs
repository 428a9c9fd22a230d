use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::state::App;
use crate::overlay::render::render_overlay;
use crate::store::SuggestionStatus;

impl App {
    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        // Editor takes the screen, status bar is one line at the bottom
        let layout = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(frame.area());
        let editor_area = layout[0];
        let status_area = layout[1];

        frame.render_widget(&self.textarea, editor_area);
        self.render_status_bar(frame, status_area);

        // Text area inside the editor border
        self.editor_area = Rect {
            x: editor_area.x + 1,
            y: editor_area.y + 1,
            width: editor_area.width.saturating_sub(2),
            height: editor_area.height.saturating_sub(2),
        };

        if let Some(set) = self.engine.overlay() {
            let cursor = cursor_screen_position(self.editor_area, self.textarea.cursor());
            render_overlay(frame, set, self.editor_area, cursor);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let context = self
            .engine
            .active_context()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());

        let (state, color) = match self.engine.overlay().map(|set| set.status) {
            Some(SuggestionStatus::Loading) => ("thinking", Color::Yellow),
            Some(SuggestionStatus::Ready) => ("ready", Color::Green),
            Some(SuggestionStatus::Error) => ("error", Color::Red),
            Some(SuggestionStatus::Idle) | None => ("idle", Color::DarkGray),
        };

        let line = Line::from(vec![
            Span::styled(
                format!(" {:?} ", self.engine.granularity()).to_lowercase(),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ),
            Span::raw(" "),
            Span::styled(context, Style::default().fg(Color::Gray)),
            Span::raw(" "),
            Span::styled(state, Style::default().fg(color)),
            Span::styled(
                "  Ctrl+Q quit",
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Approximate screen position of the cursor inside the editor
///
/// The editor scrolls to keep the cursor visible, so positions past the
/// visible area are pinned to its last row/column.
pub(crate) fn cursor_screen_position(area: Rect, (row, col): (usize, usize)) -> (u16, u16) {
    let max_row = area.height.saturating_sub(1) as usize;
    let max_col = area.width.saturating_sub(1) as usize;
    (
        area.x + col.min(max_col) as u16,
        area.y + row.min(max_row) as u16,
    )
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
