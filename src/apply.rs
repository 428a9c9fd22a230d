//! Suggestion application
//!
//! Computes the text that results from accepting a suggestion. Nothing here
//! touches the editor; the host decides how to install the new text.

use crate::context::{ContextId, char_range_to_bytes, paragraph_spans};
use crate::suggestion::SuggestionItem;

/// Join `item` onto the end of `target`
///
/// A single space separates them unless `target` already ends in
/// whitespace. Leading whitespace of the suggestion is dropped.
pub fn apply(item: &SuggestionItem, target: &str) -> String {
    let addition = item.text.trim_start();

    if target.is_empty() {
        return addition.to_string();
    }
    if addition.is_empty() {
        return target.to_string();
    }

    let mut out = String::with_capacity(target.len() + addition.len() + 1);
    out.push_str(target);
    if !target.ends_with(char::is_whitespace) {
        out.push(' ');
    }
    out.push_str(addition);
    out
}

/// Full document text after accepting a suggestion, with the cursor placed
/// at the end of the inserted text (char offset)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedEdit {
    pub text: String,
    pub cursor: usize,
}

/// Apply `item` to the part of `document` that `context_id` names
///
/// Paragraph suggestions are merged into their paragraph in place; the
/// rest of the document is kept byte for byte. A paragraph index past the
/// end starts a new paragraph.
pub fn apply_to_document(
    item: &SuggestionItem,
    document: &str,
    context_id: ContextId,
) -> AppliedEdit {
    match context_id {
        ContextId::Document => {
            let text = apply(item, document);
            let cursor = text.chars().count();
            AppliedEdit { text, cursor }
        }
        ContextId::Paragraph(index) => {
            let spans = paragraph_spans(document);
            match spans.get(index) {
                Some(span) => {
                    let (start, end) = char_range_to_bytes(document, span.start, span.end);
                    let merged = apply(item, &document[start..end]);
                    let cursor = span.start + merged.chars().count();

                    let mut text = String::with_capacity(document.len() + merged.len());
                    text.push_str(&document[..start]);
                    text.push_str(&merged);
                    text.push_str(&document[end..]);
                    AppliedEdit { text, cursor }
                }
                None => append_paragraph(item, document),
            }
        }
    }
}

fn append_paragraph(item: &SuggestionItem, document: &str) -> AppliedEdit {
    let addition = item.text.trim_start();
    let mut text = document.to_string();

    if !document.trim().is_empty() {
        let trailing_newlines = document
            .chars()
            .rev()
            .take_while(|c| c.is_whitespace())
            .filter(|&c| c == '\n')
            .count();
        for _ in trailing_newlines..2 {
            text.push('\n');
        }
    }

    text.push_str(addition);
    let cursor = text.chars().count();
    AppliedEdit { text, cursor }
}

#[cfg(test)]
#[path = "apply_tests.rs"]
mod apply_tests;
