//! Word-level types.

use super::BBox;
use serde::{Deserialize, Serialize};

/// Typographic style of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontStyle {
    /// Upright regular text
    #[default]
    Normal,
    /// Italic text
    Italic,
    /// Bold text
    Bold,
    /// Small capitals
    SmallCaps,
}

impl FontStyle {
    /// Style name as used by font lookups.
    pub fn as_str(&self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
            FontStyle::Bold => "bold",
            FontStyle::SmallCaps => "small-caps",
        }
    }

    /// Parse a style name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "normal" => Some(FontStyle::Normal),
            "italic" => Some(FontStyle::Italic),
            "bold" => Some(FontStyle::Bold),
            "small-caps" | "smallcaps" | "small caps" => Some(FontStyle::SmallCaps),
            _ => None,
        }
    }
}

/// A single recognized word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Identifier, unique within the page
    pub id: String,

    /// Recognized text
    pub text: String,

    /// Bounding box
    pub bbox: BBox,

    /// Typographic style
    pub style: FontStyle,

    /// Heavy weight, independent of `style`
    #[serde(default)]
    pub bold: bool,

    /// Font override (None = document default)
    pub font: Option<String>,

    /// Font size override (None = derived)
    pub size: Option<f64>,

    /// Recognition confidence
    pub confidence: f64,

    /// Whether the word is superscripted
    pub superscript: bool,

    /// Whether the word is a drop capital
    pub dropcap: bool,

    /// Matches ground truth under comparison
    pub comp_truth: bool,

    /// Matches ground truth under matching
    pub match_truth: bool,
}

impl Word {
    /// Create a word with default typography.
    pub fn new(id: impl Into<String>, text: impl Into<String>, bbox: BBox) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            bbox,
            style: FontStyle::Normal,
            bold: false,
            font: None,
            size: None,
            confidence: 0.0,
            superscript: false,
            dropcap: false,
            comp_truth: false,
            match_truth: false,
        }
    }

    /// Bounding box height in pixels.
    pub fn height(&self) -> f64 {
        self.bbox.height()
    }

    /// Number of characters in the word.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Deep copy of a single word. The copy shares no state with the original.
pub fn clone_word(word: &Word) -> Word {
    Word {
        id: word.id.clone(),
        text: word.text.clone(),
        bbox: word.bbox,
        style: word.style,
        bold: word.bold,
        font: word.font.clone(),
        size: word.size,
        confidence: word.confidence,
        superscript: word.superscript,
        dropcap: word.dropcap,
        comp_truth: word.comp_truth,
        match_truth: word.match_truth,
    }
}
