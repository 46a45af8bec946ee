//! Font values.

use serde::{Deserialize, Serialize};

/// A concrete font face at a point size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    /// Family name (e.g. "Helvetica")
    pub family: String,
    /// PostScript name of the face (e.g. "Helvetica-Bold")
    pub postscript_name: String,
    /// Point size
    pub size: f32,
    /// Bold trait
    pub bold: bool,
    /// Italic trait
    pub italic: bool,
    /// Platform usage hint for system UI fonts
    pub ui_usage: Option<String>,
}

impl Font {
    /// Creates a regular (non-bold, non-italic) font.
    pub fn new(family: impl Into<String>, postscript_name: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            postscript_name: postscript_name.into(),
            size,
            bold: false,
            italic: false,
            ui_usage: None,
        }
    }

    /// Sets the bold trait.
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Sets the italic trait.
    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Sets the platform usage hint.
    pub fn with_ui_usage(mut self, usage: impl Into<String>) -> Self {
        self.ui_usage = Some(usage.into());
        self
    }

    /// Returns the same face at another point size.
    pub fn with_size(&self, size: f32) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }
}
