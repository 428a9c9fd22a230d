//! Input change detection
//!
//! Turns raw editor events `(text, cursor)` into an [`EditContext`]: the
//! scope a suggestion request applies to, the text of that scope, and the
//! cursor relative to it. Offsets are `char` offsets, not bytes.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use clap::ValueEnum;
use serde::Deserialize;

/// How edits are grouped into suggestion contexts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One context for the whole document (session-scoped suggestions)
    Document,
    /// One context per paragraph (live, paragraph-scoped suggestions)
    #[default]
    Paragraph,
}

/// Scope a suggestion request/response pair applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContextId {
    Document,
    /// Zero-based paragraph index
    Paragraph(usize),
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextId::Document => write!(f, "document"),
            ContextId::Paragraph(index) => write!(f, "paragraph-{}", index),
        }
    }
}

/// Snapshot of the text a suggestion should be computed for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditContext {
    pub context_id: ContextId,
    pub text: String,
    /// Cursor offset in chars, relative to `text`
    pub cursor: usize,
}

/// A paragraph's position inside a document, in chars
///
/// `start..end` covers the paragraph text only, never the blank lines
/// separating it from its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphSpan {
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

impl ParagraphSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split `text` into paragraphs separated by one or more blank lines
pub fn paragraph_spans(text: &str) -> Vec<ParagraphSpan> {
    let mut spans = Vec::new();
    let mut current: Option<(usize, usize)> = None;
    let mut offset = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        if line.trim().is_empty() {
            if let Some((start, end)) = current.take() {
                spans.push(ParagraphSpan {
                    index: spans.len(),
                    start,
                    end,
                });
            }
        } else {
            // "\r\n" endings: the carriage return is not paragraph text
            let content_len = line.strip_suffix('\r').unwrap_or(line).chars().count();
            match current.as_mut() {
                Some((_, end)) => *end = offset + content_len,
                None => current = Some((offset, offset + content_len)),
            }
        }
        offset += line_len + 1;
    }

    if let Some((start, end)) = current {
        spans.push(ParagraphSpan {
            index: spans.len(),
            start,
            end,
        });
    }

    spans
}

/// Byte range of the chars `start..end` in `text`, clamped to its length
pub(crate) fn char_range_to_bytes(text: &str, start: usize, end: usize) -> (usize, usize) {
    let byte_at = |char_offset: usize| {
        text.char_indices()
            .nth(char_offset)
            .map(|(byte, _)| byte)
            .unwrap_or(text.len())
    };
    (byte_at(start), byte_at(end))
}

/// Current text of `context_id` in `text`, if that context still exists
pub fn context_text(text: &str, context_id: ContextId) -> Option<&str> {
    match context_id {
        ContextId::Document => Some(text),
        ContextId::Paragraph(index) => paragraph_spans(text).get(index).map(|span| {
            let (start, end) = char_range_to_bytes(text, span.start, span.end);
            &text[start..end]
        }),
    }
}

/// Build the [`EditContext`] for an edit at `cursor`
pub fn detect(granularity: Granularity, text: &str, cursor: usize) -> EditContext {
    match granularity {
        Granularity::Document => EditContext {
            context_id: ContextId::Document,
            text: text.to_string(),
            cursor: cursor.min(text.chars().count()),
        },
        Granularity::Paragraph => detect_paragraph(text, cursor),
    }
}

fn detect_paragraph(text: &str, cursor: usize) -> EditContext {
    let spans = paragraph_spans(text);

    // A cursor inside a blank separator belongs to the paragraph after it;
    // past the last paragraph it belongs to the last one.
    let span = spans
        .iter()
        .find(|span| cursor <= span.end)
        .or_else(|| spans.last());

    match span {
        Some(span) => {
            let (start, end) = char_range_to_bytes(text, span.start, span.end);
            EditContext {
                context_id: ContextId::Paragraph(span.index),
                text: text[start..end].to_string(),
                cursor: cursor.saturating_sub(span.start).min(span.len()),
            }
        }
        None => EditContext {
            context_id: ContextId::Paragraph(0),
            text: String::new(),
            cursor: 0,
        },
    }
}

fn text_hash(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

/// Watches editor events and reports contexts whose text actually changed
///
/// Cursor-only movement and repeated events with identical text are not
/// edits; text change is the only trigger for a new suggestion request.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    granularity: Granularity,
    last_text_hash: HashMap<ContextId, u64>,
}

impl ChangeDetector {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            last_text_hash: HashMap::new(),
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Handle an edit event, returning the context only if its text changed
    pub fn observe_edit(&mut self, text: &str, cursor: usize) -> Option<EditContext> {
        let context = detect(self.granularity, text, cursor);
        let hash = text_hash(&context.text);
        match self.last_text_hash.insert(context.context_id, hash) {
            Some(previous) if previous == hash => None,
            _ => Some(context),
        }
    }

    /// Handle a click: locate the context under the cursor without
    /// treating it as an edit
    pub fn observe_click(&self, text: &str, cursor: usize) -> EditContext {
        detect(self.granularity, text, cursor)
    }

    /// Forget what `context_id` last looked like, so the next edit there
    /// always counts as a change
    pub fn forget(&mut self, context_id: ContextId) {
        self.last_text_hash.remove(&context_id);
    }

    pub fn reset(&mut self) {
        self.last_text_hash.clear();
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod context_tests;
