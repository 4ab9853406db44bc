//! Line-level types.

use super::{clone_word, AngleAdjustment, BBox, Baseline, Word};
use serde::{Deserialize, Serialize};

/// A line of words sharing a baseline.
///
/// `size_calc` and `angle_adj` are memoized on first computation and are
/// not refreshed when the geometry later changes. Call
/// [`Line::invalidate_cache`] after an edit that should be reflected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Bounding box; the union of the word boxes
    pub bbox: BBox,

    /// Text baseline
    pub baseline: Baseline,

    /// Ascender height in pixels
    pub asc_height: Option<f64>,

    /// x-height in pixels
    pub x_height: Option<f64>,

    /// Words in reading order
    pub words: Vec<Word>,

    /// Manually set font size
    pub size: Option<f64>,

    #[serde(skip)]
    pub(crate) size_calc: Option<f64>,

    #[serde(skip)]
    pub(crate) angle_adj: Option<AngleAdjustment>,
}

impl Line {
    /// Create an empty line.
    pub fn new(
        bbox: BBox,
        baseline: Baseline,
        asc_height: Option<f64>,
        x_height: Option<f64>,
    ) -> Self {
        Self {
            bbox,
            baseline,
            asc_height,
            x_height,
            words: Vec::new(),
            size: None,
            size_calc: None,
            angle_adj: None,
        }
    }

    /// Append a word.
    pub fn push_word(&mut self, word: Word) {
        self.words.push(word);
    }

    /// Check if the line has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Previously calculated font size, if any.
    pub fn cached_size(&self) -> Option<f64> {
        self.size_calc
    }

    /// Previously calculated rotation offset, if any.
    pub fn cached_angle_adjustment(&self) -> Option<AngleAdjustment> {
        self.angle_adj
    }

    /// Drop memoized font size and rotation offset.
    pub fn invalidate_cache(&mut self) {
        self.size_calc = None;
        self.angle_adj = None;
    }
}

/// Words joined by a single space, trailing space included.
pub fn line_text(line: &Line) -> String {
    let mut text = String::new();
    for word in &line.words {
        text.push_str(&word.text);
        text.push(' ');
    }
    text
}

/// Deep copy of a line and its words.
///
/// Manual overrides and memoized values are carried over, so the copy
/// compares equal to the original.
pub fn clone_line(line: &Line) -> Line {
    Line {
        bbox: line.bbox,
        baseline: line.baseline,
        asc_height: line.asc_height,
        x_height: line.x_height,
        words: line.words.iter().map(clone_word).collect(),
        size: line.size,
        size_calc: line.size_calc,
        angle_adj: line.angle_adj,
    }
}
