//! # ocrdoc
//!
//! Structured document model for OCR output.
//!
//! Pages hold lines, lines hold words, and every level carries the geometry
//! and typography a renderer needs to overlay recognized text on the source
//! image. The crate keeps that model consistent while it is edited word by
//! word and while recognition engines write new results into it.
//!
//! ## Quick Start
//!
//! ```
//! use ocrdoc::model::{page_text, BBox, Baseline, Dimensions, Line, Page, Word};
//! use ocrdoc::transform::{recompute_line_bbox, rotate_page};
//!
//! let mut page = Page::new(0, Dimensions::new(2550.0, 3300.0));
//! let mut line = Line::new(BBox::default(), Baseline::default(), Some(32.0), Some(22.0));
//! line.push_word(Word::new("word_0_0", "Hello", BBox::new(300.0, 400.0, 420.0, 440.0)));
//! line.push_word(Word::new("word_0_1", "world", BBox::new(440.0, 400.0, 560.0, 440.0)));
//! recompute_line_bbox(&mut line);
//! page.push_line(line);
//!
//! rotate_page(&mut page, 0.8);
//! assert_eq!(page_text(&page), "Hello world ");
//! ```
//!
//! ## Features
//!
//! - **Geometry maintenance**: union line boxes, word/line rotation, baseline
//!   and placement offsets
//! - **Font sizing**: sizes derived from glyph heights via a pluggable
//!   metrics provider, memoized per line
//! - **Editing**: batch word edits that skip stale ids, render-state
//!   re-anchoring after font changes
//! - **Recognition coordination**: concurrent per-page jobs with a fast
//!   first pass and a slower second pass, failures reported per page

pub mod edit;
pub mod error;
pub mod font;
pub mod model;
pub mod options;
pub mod recognize;
pub mod text;
pub mod transform;

// Re-export commonly used types
pub use edit::{EditReport, WordPlacement};
pub use error::{Error, Result};
pub use font::{line_font_size, word_font_size, FontMetricsProvider, WordMetrics};
pub use model::{
    all_words, clone_line, clone_word, delete_word, find_word, line_text, page_text, BBox,
    Baseline, Dimensions, FontStyle, Line, Page, Word,
};
pub use options::{DocumentSettings, ImportFormat, RecognizeOptions};
pub use recognize::{EngineId, RecognitionBackend, RecognitionReport, Session};
pub use transform::{line_angle_adjustment, recompute_line_bbox, rotate_bbox, rotate_line};
