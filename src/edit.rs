//! Word editing operations.
//!
//! Batch edits act on a selection of word ids. Ids that no longer resolve
//! (for example a stale mapping from a rendered element) are logged and
//! skipped; the rest of the batch still applies.
//!
//! After any change to a word's text, font, style or size, the renderer-side
//! [`WordPlacement`] must be re-synchronized with [`sync_word_placement`] so
//! the edited text stays over the same region of the source image.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::font::{FontMetricsProvider, WordMetrics};
use crate::model::{delete_word, find_word, find_word_mut, FontStyle, Page};
use crate::transform::set_word_bbox;

const SMALL_CAPS_SUFFIX: &str = " Small Caps";

fn small_caps_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s+small caps$").expect("valid small caps pattern"))
}

/// Outcome of a batch edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditReport {
    /// Ids the edit was applied to
    pub applied: Vec<String>,
    /// Ids that do not exist on the page
    pub skipped: Vec<String>,
}

impl EditReport {
    fn skip(&mut self, id: &str) {
        log::warn!(
            "Selection contains word {} that does not exist in OCR data. Skipping word.",
            id
        );
        self.skipped.push(id.to_string());
    }

    /// Whether every selected id resolved.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Delete every selected word.
pub fn delete_words<S: AsRef<str>>(page: &mut Page, ids: &[S]) -> EditReport {
    let mut report = EditReport::default();
    for id in ids {
        let id = id.as_ref();
        match delete_word(page, id) {
            Some(_) => report.applied.push(id.to_string()),
            None => report.skip(id),
        }
    }
    report
}

/// Toggle a style on the selection.
///
/// If the first resolvable word already has `style`, the whole selection
/// reverts to normal; otherwise the whole selection takes `style`.
pub fn toggle_word_style<S: AsRef<str>>(page: &mut Page, ids: &[S], style: FontStyle) -> EditReport {
    let current: &Page = page;
    let enable = ids
        .iter()
        .find_map(|id| find_word(current, id.as_ref()))
        .map(|w| w.style != style)
        .unwrap_or(true);
    let target = if enable { style } else { FontStyle::Normal };

    let mut report = EditReport::default();
    for id in ids {
        let id = id.as_ref();
        match find_word_mut(page, id) {
            Some(word) => {
                word.style = target;
                report.applied.push(id.to_string());
            }
            None => report.skip(id),
        }
    }
    report
}

/// Set an explicit font size on the selection.
///
/// When more than one word is selected, superscripts keep their size so
/// that normalizing a block does not flatten them.
pub fn set_word_size<S: AsRef<str>>(page: &mut Page, ids: &[S], size: f64) -> EditReport {
    let multiple = ids.len() > 1;
    let mut report = EditReport::default();
    for id in ids {
        let id = id.as_ref();
        match find_word_mut(page, id) {
            Some(word) if multiple && word.superscript => {}
            Some(word) => {
                word.size = Some(size);
                report.applied.push(id.to_string());
            }
            None => report.skip(id),
        }
    }
    report
}

/// Set the font of the selection; `None` restores the document default.
pub fn set_word_font<S: AsRef<str>>(page: &mut Page, ids: &[S], font: Option<&str>) -> EditReport {
    let mut report = EditReport::default();
    for id in ids {
        let id = id.as_ref();
        match find_word_mut(page, id) {
            Some(word) => {
                word.font = font.map(str::to_string);
                report.applied.push(id.to_string());
            }
            None => report.skip(id),
        }
    }
    report
}

/// Flip the superscript flag of each selected word.
pub fn toggle_superscript<S: AsRef<str>>(page: &mut Page, ids: &[S]) -> EditReport {
    let mut report = EditReport::default();
    for id in ids {
        let id = id.as_ref();
        match find_word_mut(page, id) {
            Some(word) => {
                word.superscript = !word.superscript;
                report.applied.push(id.to_string());
            }
            None => report.skip(id),
        }
    }
    report
}

/// Replace the text of a word.
pub fn set_word_text(page: &mut Page, id: &str, text: impl Into<String>) -> Result<()> {
    let word = find_word_mut(page, id).ok_or_else(|| Error::WordNotFound(id.to_string()))?;
    word.text = text.into();
    Ok(())
}

/// Move a word's box; the line box follows.
pub fn move_word(page: &mut Page, id: &str, dx: f64, dy: f64) -> Result<()> {
    let mut bbox = find_word(page, id)
        .ok_or_else(|| Error::WordNotFound(id.to_string()))?
        .bbox;
    bbox.left += dx;
    bbox.right += dx;
    bbox.top += dy;
    bbox.bottom += dy;
    set_word_bbox(page, id, bbox)
}

/// Shift the baseline intercept of the line holding `word_id` by `delta`.
pub fn adjust_line_baseline(page: &mut Page, word_id: &str, delta: f64) -> Result<()> {
    let idx = page
        .line_of(word_id)
        .ok_or_else(|| Error::WordNotFound(word_id.to_string()))?;
    page.lines[idx].baseline.intercept += delta;
    Ok(())
}

/// Renderer family name for a base font under a style.
///
/// Small caps are drawn from a separate family named with a
/// `" Small Caps"` suffix; any other style uses the bare family.
pub fn display_font_family(base: &str, style: FontStyle) -> String {
    let bare = small_caps_suffix().replace(base, "");
    if style == FontStyle::SmallCaps {
        format!("{}{}", bare, SMALL_CAPS_SUFFIX)
    } else {
        bare.into_owned()
    }
}

/// Renderer-side state of a word drawn over the source image.
#[derive(Debug, Clone, PartialEq)]
pub struct WordPlacement {
    /// Word id in the model
    pub word_id: String,
    /// Displayed text
    pub text: String,
    /// Base font family (without style suffixes)
    pub font_family: String,
    /// Font size
    pub font_size: f64,
    /// Font style
    pub style: FontStyle,
    /// Left edge of the ink to stay anchored to
    pub visual_left: f64,
    /// Width of the ink to stay anchored to
    pub visual_width: f64,
    /// Extra horizontal offset from a batch (group) transform
    pub group_offset_left: f64,
    /// Drawing origin
    pub left: f64,
    /// Inter-character spacing in thousandths of the font size
    pub char_spacing: f64,
}

impl WordPlacement {
    /// Placement anchored to an inked region.
    pub fn new(
        word_id: impl Into<String>,
        text: impl Into<String>,
        font_family: impl Into<String>,
        font_size: f64,
        visual_left: f64,
        visual_width: f64,
    ) -> Self {
        Self {
            word_id: word_id.into(),
            text: text.into(),
            font_family: font_family.into(),
            font_size,
            style: FontStyle::Normal,
            visual_left,
            visual_width,
            group_offset_left: 0.0,
            left: visual_left,
            char_spacing: 0.0,
        }
    }

    /// Set the style.
    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the offset contributed by a group transform.
    pub fn with_group_offset(mut self, offset: f64) -> Self {
        self.group_offset_left = offset;
        self
    }
}

/// Re-measure a placement and re-anchor it to its inked region.
///
/// The origin moves so the new left-side bearing lands on `visual_left`.
/// Words of two or more characters get character spacing that stretches or
/// squeezes the new rendering to `visual_width`; single characters keep
/// their spacing.
pub async fn sync_word_placement<P>(placement: &mut WordPlacement, provider: &P) -> Result<WordMetrics>
where
    P: FontMetricsProvider + ?Sized,
{
    if placement.font_size <= 0.0 {
        return Err(Error::FontMetrics(format!(
            "word {} has non-positive font size {}",
            placement.word_id, placement.font_size
        )));
    }

    let metrics = provider
        .word_metrics(
            &placement.text,
            &placement.font_family,
            placement.font_size,
            placement.style,
        )
        .await?;

    placement.left =
        placement.visual_left - metrics.left_side_bearing - placement.group_offset_left;

    let chars = placement.text.chars().count();
    if chars > 1 {
        let kerning = (placement.visual_width - metrics.visual_width) / (chars - 1) as f64;
        placement.char_spacing = kerning * 1000.0 / placement.font_size;
    }

    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::TableProvider;
    use crate::model::{BBox, Baseline, Dimensions, Line, Word};

    fn sample_page() -> Page {
        let mut page = Page::new(0, Dimensions::new(800.0, 1000.0));
        let mut line = Line::new(
            BBox::new(10.0, 10.0, 90.0, 30.0),
            Baseline::new(0.0, -3.0),
            None,
            None,
        );
        line.push_word(Word::new("w0", "alpha", BBox::new(10.0, 10.0, 40.0, 30.0)));
        let mut sup = Word::new("w1", "2", BBox::new(42.0, 8.0, 48.0, 18.0));
        sup.superscript = true;
        line.push_word(sup);
        line.push_word(Word::new("w2", "beta", BBox::new(50.0, 10.0, 90.0, 30.0)));
        page.push_line(line);
        page
    }

    #[test]
    fn test_delete_words_skips_missing() {
        let mut page = sample_page();
        let report = delete_words(&mut page, &["w0", "ghost", "w2"]);
        assert_eq!(report.applied, vec!["w0", "w2"]);
        assert_eq!(report.skipped, vec!["ghost"]);
        assert!(!report.is_complete());
        assert_eq!(page.word_count(), 1);
    }

    #[test]
    fn test_toggle_style_enables_then_disables() {
        let mut page = sample_page();
        toggle_word_style(&mut page, &["w0", "w2"], FontStyle::Italic);
        assert_eq!(find_word(&page, "w2").unwrap().style, FontStyle::Italic);

        toggle_word_style(&mut page, &["w0", "w2"], FontStyle::Italic);
        assert_eq!(find_word(&page, "w0").unwrap().style, FontStyle::Normal);
        assert_eq!(find_word(&page, "w2").unwrap().style, FontStyle::Normal);
    }

    #[test]
    fn test_toggle_style_first_missing_uses_next() {
        let mut page = sample_page();
        find_word_mut(&mut page, "w0").unwrap().style = FontStyle::Bold;
        let report = toggle_word_style(&mut page, &["ghost", "w0", "w2"], FontStyle::Bold);
        assert_eq!(report.skipped, vec!["ghost"]);
        assert_eq!(find_word(&page, "w2").unwrap().style, FontStyle::Normal);
    }

    #[test]
    fn test_set_size_spares_superscripts_in_batch() {
        let mut page = sample_page();
        let report = set_word_size(&mut page, &["w0", "w1", "w2"], 14.0);
        assert_eq!(report.applied, vec!["w0", "w2"]);
        assert_eq!(find_word(&page, "w1").unwrap().size, None);

        set_word_size(&mut page, &["w1"], 6.0);
        assert_eq!(find_word(&page, "w1").unwrap().size, Some(6.0));
    }

    #[test]
    fn test_set_font_and_default() {
        let mut page = sample_page();
        set_word_font(&mut page, &["w0"], Some("Garamond"));
        assert_eq!(find_word(&page, "w0").unwrap().font.as_deref(), Some("Garamond"));
        set_word_font(&mut page, &["w0"], None);
        assert!(find_word(&page, "w0").unwrap().font.is_none());
    }

    #[test]
    fn test_toggle_superscript() {
        let mut page = sample_page();
        toggle_superscript(&mut page, &["w0", "w1"]);
        assert!(find_word(&page, "w0").unwrap().superscript);
        assert!(!find_word(&page, "w1").unwrap().superscript);
    }

    #[test]
    fn test_adjust_line_baseline() {
        let mut page = sample_page();
        adjust_line_baseline(&mut page, "w2", 4.0).unwrap();
        assert_eq!(page.lines[0].baseline.intercept, 1.0);
        assert!(matches!(
            adjust_line_baseline(&mut page, "ghost", 1.0),
            Err(Error::WordNotFound(_))
        ));
    }

    #[test]
    fn test_move_word_updates_line_box() {
        let mut page = sample_page();
        move_word(&mut page, "w2", 20.0, 0.0).unwrap();
        assert_eq!(page.lines[0].bbox.right, 110.0);
        assert_eq!(page.lines[0].bbox.top, 8.0);
    }

    #[test]
    fn test_set_word_text() {
        let mut page = sample_page();
        set_word_text(&mut page, "w0", "omega").unwrap();
        assert_eq!(find_word(&page, "w0").unwrap().text, "omega");
        assert!(set_word_text(&mut page, "ghost", "x").is_err());
    }

    #[test]
    fn test_display_font_family() {
        assert_eq!(
            display_font_family("Garamond", FontStyle::SmallCaps),
            "Garamond Small Caps"
        );
        assert_eq!(
            display_font_family("Garamond small caps", FontStyle::SmallCaps),
            "Garamond Small Caps"
        );
        assert_eq!(
            display_font_family("Garamond Small Caps", FontStyle::Italic),
            "Garamond"
        );
    }

    #[tokio::test]
    async fn test_sync_placement_anchors_and_spaces() {
        let provider = TableProvider::new();
        // 4 chars at size 10 measure 20 wide with bearing 1.
        let mut placement = WordPlacement::new("w0", "word", "Garamond", 10.0, 100.0, 26.0)
            .with_group_offset(5.0);
        let metrics = sync_word_placement(&mut placement, &provider).await.unwrap();

        assert_eq!(metrics.visual_width, 20.0);
        assert_eq!(placement.left, 94.0);
        // (26 - 20) / 3 = 2 px per gap, 2 * 1000 / 10
        assert!((placement.char_spacing - 200.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_sync_placement_single_char_keeps_spacing() {
        let provider = TableProvider::new();
        let mut placement = WordPlacement::new("w1", "I", "Garamond", 10.0, 50.0, 9.0);
        placement.char_spacing = 12.0;
        sync_word_placement(&mut placement, &provider).await.unwrap();
        assert_eq!(placement.char_spacing, 12.0);
        assert_eq!(placement.left, 49.0);
    }

    #[tokio::test]
    async fn test_sync_placement_rejects_zero_size() {
        let provider = TableProvider::new();
        let mut placement = WordPlacement::new("w1", "Io", "Garamond", 0.0, 50.0, 9.0);
        assert!(matches!(
            sync_word_placement(&mut placement, &provider).await,
            Err(Error::FontMetrics(_))
        ));
    }
}
