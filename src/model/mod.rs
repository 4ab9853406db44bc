//! Document model types for OCR output.
//!
//! Pages own lines, lines own words. Words are addressed by an id that is
//! unique within their page; nothing below a page points back up to it, so
//! operations that need page geometry take a [`PageFrame`] explicitly.

mod geometry;
mod line;
mod page;
mod word;

pub use geometry::{AngleAdjustment, BBox, Baseline, Dimensions, PageFrame};
pub use line::{clone_line, line_text, Line};
pub use page::{all_words, delete_word, find_word, find_word_mut, page_text, Page};
pub use word::{clone_word, FontStyle, Word};
