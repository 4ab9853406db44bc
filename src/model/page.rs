//! Page-level types.

use super::{line_text, Dimensions, Line, PageFrame, Word};
use serde::{Deserialize, Serialize};

/// A single page of OCR output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page index (0-indexed)
    pub n: usize,

    /// Source image dimensions
    pub dims: Dimensions,

    /// Skew-correction angle in degrees
    pub angle: f64,

    /// Horizontal offset of the text block
    pub left: f64,

    /// Lines in reading order
    pub lines: Vec<Line>,
}

impl Page {
    /// Create an empty page with the given dimensions.
    pub fn new(n: usize, dims: Dimensions) -> Self {
        Self {
            n,
            dims,
            angle: 0.0,
            left: 0.0,
            lines: Vec::new(),
        }
    }

    /// Add a line to the page.
    pub fn push_line(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// Geometry needed for rotating lines of this page.
    pub fn frame(&self) -> PageFrame {
        PageFrame {
            dims: self.dims,
            angle: self.angle,
        }
    }

    /// Check if the page is empty (no lines).
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of words on the page.
    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|l| l.words.len()).sum()
    }

    /// Index of the line holding the word with `id`.
    pub fn line_of(&self, id: &str) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.words.iter().any(|w| w.id == id))
    }
}

/// Find a word by id.
pub fn find_word<'a>(page: &'a Page, id: &str) -> Option<&'a Word> {
    page.lines
        .iter()
        .flat_map(|line| line.words.iter())
        .find(|w| w.id == id)
}

/// Find a word by id for mutation.
pub fn find_word_mut<'a>(page: &'a mut Page, id: &str) -> Option<&'a mut Word> {
    page.lines
        .iter_mut()
        .flat_map(|line| line.words.iter_mut())
        .find(|w| w.id == id)
}

/// All words on the page in reading order.
pub fn all_words(page: &Page) -> Vec<&Word> {
    page.lines.iter().flat_map(|line| line.words.iter()).collect()
}

/// Remove the first word with `id` and return it.
///
/// Returns `None` when no such word exists. A line left without words is
/// kept on the page.
pub fn delete_word(page: &mut Page, id: &str) -> Option<Word> {
    for line in page.lines.iter_mut() {
        if let Some(pos) = line.words.iter().position(|w| w.id == id) {
            return Some(line.words.remove(pos));
        }
    }
    None
}

/// Text of every line concatenated, without separators between lines.
pub fn page_text(page: &Page) -> String {
    page.lines.iter().map(line_text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Baseline};

    fn sample_page() -> Page {
        let mut page = Page::new(0, Dimensions::new(1000.0, 1400.0));
        let mut first = Line::new(BBox::default(), Baseline::default(), None, None);
        first.push_word(Word::new("w0", "The", BBox::new(0.0, 0.0, 10.0, 10.0)));
        first.push_word(Word::new("w1", "quick", BBox::new(12.0, 0.0, 30.0, 10.0)));
        let mut second = Line::new(BBox::default(), Baseline::default(), None, None);
        second.push_word(Word::new("w2", "fox", BBox::new(0.0, 20.0, 10.0, 30.0)));
        page.push_line(first);
        page.push_line(second);
        page
    }

    #[test]
    fn test_find_word() {
        let page = sample_page();
        assert_eq!(find_word(&page, "w2").map(|w| w.text.as_str()), Some("fox"));
        assert!(find_word(&page, "missing").is_none());
        assert_eq!(page.line_of("w1"), Some(0));
        assert_eq!(page.line_of("w2"), Some(1));
    }

    #[test]
    fn test_all_words_order() {
        let page = sample_page();
        let texts: Vec<_> = all_words(&page).iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["The", "quick", "fox"]);
        assert_eq!(page.word_count(), 3);
    }

    #[test]
    fn test_page_text_has_no_line_separator() {
        let page = sample_page();
        assert_eq!(page_text(&page), "The quick fox ");
    }

    #[test]
    fn test_delete_word_keeps_empty_line() {
        let mut page = sample_page();
        let removed = delete_word(&mut page, "w2");
        assert_eq!(removed.map(|w| w.text), Some("fox".to_string()));
        assert_eq!(page.lines.len(), 2);
        assert!(page.lines[1].is_empty());
        assert!(delete_word(&mut page, "w2").is_none());
    }

    #[test]
    fn test_find_word_mut() {
        let mut page = sample_page();
        if let Some(word) = find_word_mut(&mut page, "w0") {
            word.text = "A".into();
        }
        assert_eq!(page_text(&page), "A quick fox ");
    }
}
