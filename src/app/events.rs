use color_eyre::Result;
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use super::state::App;
use crate::engine::KeyOutcome;

impl App {
    /// Handle one terminal event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            // Check that it's a key press event to avoid duplicates
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key),
            Event::Paste(text) => {
                self.textarea.insert_str(text);
                self.notify_edit();
            }
            _ => {}
        }
    }

    /// Handle key press events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if is_quit(key) {
            self.should_quit = true;
            return;
        }

        let document = self.document();
        match self.engine.handle_key(key, &document) {
            KeyOutcome::Consumed => {}
            KeyOutcome::Accepted(edit) => self.set_document(&edit.text, edit.cursor),
            KeyOutcome::Ignored => {
                if self.textarea.input(key) {
                    self.notify_edit();
                } else {
                    let cursor = self.cursor_offset();
                    self.engine.on_click(&document, cursor);
                }
            }
        }
    }

    fn notify_edit(&mut self) {
        let document = self.document();
        let cursor = self.cursor_offset();
        let outcome = self.engine.on_edit(&document, cursor);
        log::trace!("Edit at {}: {:?}", cursor, outcome);
    }
}

/// Ctrl+C or Ctrl+Q
fn is_quit(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
}

/// Read terminal events on a dedicated thread
///
/// crossterm's reader blocks, so it cannot share the runtime thread with
/// the engine's timers.
fn spawn_input_reader() -> UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::warn!("Terminal input failed: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

/// Main loop: draw, then wait for either input or engine progress
pub async fn run(mut terminal: DefaultTerminal, mut app: App) -> Result<()> {
    let mut input = spawn_input_reader();

    loop {
        terminal.draw(|frame| app.render(frame))?;

        tokio::select! {
            event = input.recv() => match event {
                Some(event) => app.handle_event(event),
                None => break,
            },
            update = app.engine.next_event() => {
                if let Some(update) = update {
                    log::trace!("Engine update: {:?}", update);
                }
            }
        }

        // Pick up anything that finished while we were handling input
        app.engine.poll();

        if app.should_quit() {
            break;
        }
    }

    app.engine.shutdown();
    Ok(())
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod events_tests;
