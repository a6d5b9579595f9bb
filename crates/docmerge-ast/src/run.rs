//! Text runs and their formatting
//!
//! A run is the smallest unit of uniformly formatted text. Rewriting a run's
//! text must never change how it looks, so the text and the formatting are
//! kept apart: [`Run::with_text`] produces a new run carrying the old
//! formatting forward.

use serde::{Deserialize, Serialize};

/// Visual attributes of a run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunFormat {
    /// Bold weight
    pub bold: bool,
    /// Italic style
    pub italic: bool,
    /// Underline kind (`single`, `double`, ...), `None` when not underlined
    pub underline: Option<String>,
    /// Font family name
    pub font_name: Option<String>,
    /// Font size in half-points (OOXML `w:sz` units)
    pub font_size: Option<u32>,
    /// Font color as a hex RGB string (e.g. `FF0000`) or `auto`
    pub color: Option<String>,
}

impl RunFormat {
    /// Take a snapshot of a run's formatting
    pub fn capture(run: &Run) -> Self {
        run.format.clone()
    }

    /// Reapply this snapshot to a run, overwriting its formatting
    pub fn apply(&self, run: &mut Run) {
        run.format = self.clone();
    }

    /// True if no attribute is set
    pub fn is_plain(&self) -> bool {
        *self == RunFormat::default()
    }

    /// Font size in points
    pub fn size_points(&self) -> Option<f32> {
        self.font_size.map(|half| half as f32 / 2.0)
    }
}

/// A run of text with uniform formatting
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Run {
    /// The text content
    pub text: String,
    /// Formatting attributes
    pub format: RunFormat,
    /// Position of this run in the source container, if it came from one
    pub origin: Option<usize>,
}

impl Run {
    /// Create an unformatted run
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a run with explicit formatting
    pub fn formatted(text: impl Into<String>, format: RunFormat) -> Self {
        Self {
            text: text.into(),
            format,
            origin: None,
        }
    }

    /// Return a copy of this run holding `text`, with every other field
    /// (formatting, origin) carried forward unchanged.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: self.format.clone(),
            origin: self.origin,
        }
    }

    /// Check if the run has no text
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled() -> RunFormat {
        RunFormat {
            bold: true,
            italic: true,
            underline: Some("single".to_string()),
            font_name: Some("Arial".to_string()),
            font_size: Some(24),
            color: Some("FF0000".to_string()),
        }
    }

    #[test]
    fn test_with_text_keeps_format() {
        let run = Run {
            text: "{name}".to_string(),
            format: styled(),
            origin: Some(7),
        };
        let replaced = run.with_text("Budi");

        assert_eq!(replaced.text, "Budi");
        assert_eq!(replaced.format, run.format);
        assert_eq!(replaced.origin, Some(7));
        // the source run is untouched
        assert_eq!(run.text, "{name}");
    }

    #[test]
    fn test_capture_and_apply() {
        let mut run = Run::formatted("x", styled());
        let snapshot = RunFormat::capture(&run);

        run.format = RunFormat::default();
        assert!(run.format.is_plain());

        snapshot.apply(&mut run);
        assert_eq!(run.format, styled());
    }

    #[test]
    fn test_size_points() {
        assert_eq!(styled().size_points(), Some(12.0));
        assert_eq!(RunFormat::default().size_points(), None);
    }

    #[test]
    fn test_run_serde() {
        let run = Run::formatted("Total", styled());
        let json = serde_json::to_string(&run).unwrap();
        let back: Run = serde_json::from_str(&json).unwrap();
        assert_eq!(back, run);
    }
}
