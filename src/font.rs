//! Font-size resolution.
//!
//! Font size does not come purely from image pixels: the same nominal size
//! draws glyphs of different heights in different fonts. Sizes are therefore
//! derived from measured glyph heights together with metrics of the font in
//! use, which an external [`FontMetricsProvider`] supplies.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{FontStyle, Line, Word};
use crate::options::DocumentSettings;

/// Reference glyph for ascender-height measurements.
pub const ASCENDER_GLYPH: &str = "A";

/// Reference glyph for x-height measurements.
pub const X_HEIGHT_GLYPH: &str = "o";

/// Reference glyph for superscripts.
pub const SUPERSCRIPT_GLYPH: &str = "1";

/// Horizontal metrics of a word rendered in a given font.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WordMetrics {
    /// Space between the drawing origin and the first ink
    pub left_side_bearing: f64,
    /// Width of the inked region
    pub visual_width: f64,
}

/// Source of font measurements.
///
/// Calls may run concurrently for different lines and words.
#[async_trait]
pub trait FontMetricsProvider: Send + Sync {
    /// Font size at which `glyph` in `font` is `pixel_height` pixels tall.
    async fn font_size_for_height(
        &self,
        font: &str,
        style: FontStyle,
        pixel_height: f64,
        glyph: &str,
    ) -> Result<f64>;

    /// Bearing and visual width of `text` set in `font` at `size`.
    async fn word_metrics(
        &self,
        text: &str,
        font: &str,
        size: f64,
        style: FontStyle,
    ) -> Result<WordMetrics>;
}

/// Font size for a word, or `None` when the line size applies.
///
/// An explicit size wins; superscripts and drop capitals are sized from
/// their own box height.
pub async fn word_font_size<P>(
    word: &Word,
    provider: &P,
    settings: &DocumentSettings,
) -> Result<Option<f64>>
where
    P: FontMetricsProvider + ?Sized,
{
    if let Some(size) = word.size {
        return Ok(Some(size));
    }

    let glyph = if word.superscript {
        SUPERSCRIPT_GLYPH.to_string()
    } else if word.dropcap {
        match word.text.chars().next() {
            Some(first) => first.to_string(),
            None => {
                log::debug!("Drop capital {} has no text, using line size", word.id);
                return Ok(None);
            }
        }
    } else {
        return Ok(None);
    };

    let height = word.height();
    if height <= 0.0 {
        log::debug!("Word {} has no measurable height, using line size", word.id);
        return Ok(None);
    }

    let font = settings.font_or_default(word.font.as_deref());
    let size = provider
        .font_size_for_height(font, FontStyle::Normal, height, &glyph)
        .await?;
    Ok(Some(size))
}

/// Font size for a line.
///
/// A manual size wins, then a previously calculated one. Otherwise the size
/// is derived from the ascender height, the x-height, or the floor of the
/// mean of both, and memoized on the line. Returns `None` when neither
/// height is known; callers supply their own fallback.
pub async fn line_font_size<P>(
    line: &mut Line,
    provider: &P,
    settings: &DocumentSettings,
) -> Result<Option<f64>>
where
    P: FontMetricsProvider + ?Sized,
{
    if let Some(size) = line.size {
        return Ok(Some(size));
    }
    if let Some(size) = line.size_calc {
        return Ok(Some(size));
    }

    let font = settings
        .font_or_default(line.words.first().and_then(|w| w.font.as_deref()))
        .to_string();

    let asc_height = line.asc_height.filter(|h| *h > 0.0);
    let x_height = line.x_height.filter(|h| *h > 0.0);

    let size = match (asc_height, x_height) {
        (Some(asc), None) => Some(
            provider
                .font_size_for_height(&font, FontStyle::Normal, asc, ASCENDER_GLYPH)
                .await?,
        ),
        (None, Some(xh)) => Some(
            provider
                .font_size_for_height(&font, FontStyle::Normal, xh, X_HEIGHT_GLYPH)
                .await?,
        ),
        (Some(asc), Some(xh)) => {
            let from_asc = provider
                .font_size_for_height(&font, FontStyle::Normal, asc, ASCENDER_GLYPH)
                .await?;
            let from_x = provider
                .font_size_for_height(&font, FontStyle::Normal, xh, X_HEIGHT_GLYPH)
                .await?;
            Some(((from_asc + from_x) / 2.0).floor())
        }
        (None, None) => None,
    };

    if size.is_some() {
        line.size_calc = size;
    }
    Ok(size)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{BBox, Baseline};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Provider with fixed answers per reference glyph.
    pub(crate) struct TableProvider {
        pub calls: AtomicUsize,
        pub fonts: Mutex<Vec<String>>,
    }

    impl TableProvider {
        pub fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fonts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FontMetricsProvider for TableProvider {
        async fn font_size_for_height(
            &self,
            font: &str,
            _style: FontStyle,
            pixel_height: f64,
            glyph: &str,
        ) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.fonts.lock().unwrap().push(font.to_string());
            Ok(match glyph {
                "A" => pixel_height * 1.5,
                "o" => pixel_height * 2.4,
                "1" => 7.0,
                _ => pixel_height * 1.2,
            })
        }

        async fn word_metrics(
            &self,
            text: &str,
            _font: &str,
            size: f64,
            _style: FontStyle,
        ) -> Result<WordMetrics> {
            Ok(WordMetrics {
                left_side_bearing: 1.0,
                visual_width: text.chars().count() as f64 * size * 0.5,
            })
        }
    }

    fn line_with(asc: Option<f64>, xh: Option<f64>) -> Line {
        Line::new(BBox::default(), Baseline::default(), asc, xh)
    }

    #[tokio::test]
    async fn test_line_size_averages_both_heights() {
        let provider = TableProvider::new();
        let settings = DocumentSettings::default();
        let mut line = line_with(Some(20.0), Some(10.0));
        let size = line_font_size(&mut line, &provider, &settings).await.unwrap();
        // 20 * 1.5 = 30, 10 * 2.4 = 24
        assert_eq!(size, Some(27.0));
        assert_eq!(line.cached_size(), Some(27.0));
    }

    #[tokio::test]
    async fn test_line_size_single_metric() {
        let provider = TableProvider::new();
        let settings = DocumentSettings::default();

        let mut asc_only = line_with(Some(20.0), None);
        assert_eq!(
            line_font_size(&mut asc_only, &provider, &settings).await.unwrap(),
            Some(30.0)
        );

        let mut x_only = line_with(None, Some(10.0));
        assert_eq!(
            line_font_size(&mut x_only, &provider, &settings).await.unwrap(),
            Some(24.0)
        );
    }

    #[tokio::test]
    async fn test_line_size_unknown_without_metrics() {
        let provider = TableProvider::new();
        let mut line = line_with(None, None);
        let size = line_font_size(&mut line, &provider, &DocumentSettings::default())
            .await
            .unwrap();
        assert!(size.is_none());
        assert!(line.cached_size().is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_line_size_memoized_and_override() {
        let provider = TableProvider::new();
        let settings = DocumentSettings::default();
        let mut line = line_with(Some(20.0), None);

        line_font_size(&mut line, &provider, &settings).await.unwrap();
        line.asc_height = Some(40.0);
        let again = line_font_size(&mut line, &provider, &settings).await.unwrap();
        assert_eq!(again, Some(30.0));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        line.size = Some(9.0);
        let manual = line_font_size(&mut line, &provider, &settings).await.unwrap();
        assert_eq!(manual, Some(9.0));
    }

    #[tokio::test]
    async fn test_line_size_uses_first_word_font() {
        let provider = TableProvider::new();
        let settings = DocumentSettings::default().with_default_font("Fallback");
        let mut line = line_with(Some(20.0), None);
        let mut word = Word::new("w", "hi", BBox::default());
        word.font = Some("Garamond".into());
        line.push_word(word);

        line_font_size(&mut line, &provider, &settings).await.unwrap();
        assert_eq!(provider.fonts.lock().unwrap().as_slice(), ["Garamond"]);
    }

    #[tokio::test]
    async fn test_word_size_priority() {
        let provider = TableProvider::new();
        let settings = DocumentSettings::default();
        let mut word = Word::new("w", "Once", BBox::new(0.0, 0.0, 40.0, 50.0));

        assert_eq!(word_font_size(&word, &provider, &settings).await.unwrap(), None);

        word.dropcap = true;
        assert_eq!(
            word_font_size(&word, &provider, &settings).await.unwrap(),
            Some(60.0)
        );

        word.superscript = true;
        assert_eq!(
            word_font_size(&word, &provider, &settings).await.unwrap(),
            Some(7.0)
        );

        word.size = Some(11.0);
        assert_eq!(
            word_font_size(&word, &provider, &settings).await.unwrap(),
            Some(11.0)
        );
        assert_eq!(
            provider.fonts.lock().unwrap().first().map(String::as_str),
            Some(crate::options::DEFAULT_FONT)
        );
    }

    #[tokio::test]
    async fn test_zero_height_word_inherits_line_size() {
        let provider = TableProvider::new();
        let settings = DocumentSettings::default();
        let mut word = Word::new("w", "2", BBox::new(0.0, 10.0, 5.0, 10.0));
        word.superscript = true;

        assert_eq!(word_font_size(&word, &provider, &settings).await.unwrap(), None);

        word.superscript = false;
        word.dropcap = true;
        word.bbox = BBox::new(0.0, 12.0, 5.0, 10.0);
        assert_eq!(word_font_size(&word, &provider, &settings).await.unwrap(), None);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
