//! Error types for ocrdoc library.

use thiserror::Error;

/// Result type alias for ocrdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while maintaining or populating a document.
#[derive(Error, Debug)]
pub enum Error {
    /// An edit referenced a word id that does not exist on the page.
    #[error("Word {0} does not exist in OCR data")]
    WordNotFound(String),

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// The font-metrics provider failed to measure a glyph or word.
    #[error("Font metrics error: {0}")]
    FontMetrics(String),

    /// A recognition or conversion job rejected.
    #[error("Recognition job failed: {0}")]
    JobFailed(String),

    /// A job was dropped before it delivered a result.
    #[error("Recognition job for page {0} was dropped before completing")]
    JobDropped(usize),

    /// The worker pool could not be made ready.
    #[error("Worker pool unavailable: {0}")]
    PoolUnavailable(String),

    /// Import format is not recognized.
    #[error("Unsupported import format: {0}")]
    UnsupportedFormat(String),

    /// Options failed validation.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the error is absorbed locally rather than surfaced.
    ///
    /// Stale word references are skipped by batch edits; everything else
    /// must reach the caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::WordNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::WordNotFound("word_1_4".into());
        assert_eq!(err.to_string(), "Word word_1_4 does not exist in OCR data");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_recoverable() {
        assert!(Error::WordNotFound("x".into()).is_recoverable());
        assert!(!Error::JobDropped(0).is_recoverable());
    }
}
