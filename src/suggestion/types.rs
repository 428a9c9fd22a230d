//! Suggestion item and type tag
//!
//! The service tags each suggestion with the kind of writing it continues
//! (dialogue, action, ...). The tag and confidence only affect presentation.

use ratatui::style::Color;

// =========================================================================
// Suggestion Types
// =========================================================================

/// Kind of writing a suggestion offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuggestionType {
    /// Plain continuation of the current sentence - displayed in cyan
    #[default]
    Continuation,
    /// Spoken lines - displayed in magenta
    Dialogue,
    /// Physical action - displayed in red
    Action,
    /// Emotion, motivation, inner life - displayed in yellow
    CharacterDevelopment,
    /// Setting and scene description - displayed in green
    Description,
    /// Anything the service tags with an unknown type - displayed in gray
    General,
}

impl SuggestionType {
    /// Get the color for this suggestion type
    pub fn color(&self) -> Color {
        match self {
            SuggestionType::Continuation => Color::Cyan,
            SuggestionType::Dialogue => Color::Magenta,
            SuggestionType::Action => Color::Red,
            SuggestionType::CharacterDevelopment => Color::Yellow,
            SuggestionType::Description => Color::Green,
            SuggestionType::General => Color::Gray,
        }
    }

    /// Parse a type tag as sent by the suggestion service
    ///
    /// Case-insensitive; `_`, `-` and spaces are interchangeable. Unknown
    /// tags map to `General` rather than failing the whole response.
    pub fn parse_type(s: &str) -> Self {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '_' | '-' => ' ',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "continuation" | "continue" | "completion" => SuggestionType::Continuation,
            "dialogue" | "dialog" => SuggestionType::Dialogue,
            "action" => SuggestionType::Action,
            "character development" | "character" => SuggestionType::CharacterDevelopment,
            "description" | "scene" => SuggestionType::Description,
            _ => SuggestionType::General,
        }
    }

    /// Get the display label for this type
    pub fn label(&self) -> &'static str {
        match self {
            SuggestionType::Continuation => "[Continue]",
            SuggestionType::Dialogue => "[Dialogue]",
            SuggestionType::Action => "[Action]",
            SuggestionType::CharacterDevelopment => "[Character]",
            SuggestionType::Description => "[Scene]",
            SuggestionType::General => "[Idea]",
        }
    }
}

/// Clamp a confidence score into `[0, 1]`; NaN becomes 0
pub fn clamp_confidence(confidence: f32) -> f32 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// One candidate text fragment offered to the writer
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionItem {
    pub text: String,
    pub type_tag: SuggestionType,
    /// Always within `0.0..=1.0`
    pub confidence: f32,
}

impl SuggestionItem {
    /// Create an item, clamping `confidence` into `[0, 1]` (NaN becomes 0)
    pub fn new(text: impl Into<String>, type_tag: SuggestionType, confidence: f32) -> Self {
        Self {
            text: text.into(),
            type_tag,
            confidence: clamp_confidence(confidence),
        }
    }

    /// Confidence bucket used by the overlay: 0 (low) to 3 (high)
    pub fn confidence_level(&self) -> u8 {
        match self.confidence {
            c if c >= 0.75 => 3,
            c if c >= 0.5 => 2,
            c if c >= 0.25 => 1,
            _ => 0,
        }
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
