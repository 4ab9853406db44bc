//! Document settings and recognition options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Font used when no word or line specifies one.
pub const DEFAULT_FONT: &str = "SerifDefault";

/// Document-wide settings consumed by the font-size resolver and editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    /// Default font name
    pub default_font: String,
}

impl DocumentSettings {
    /// Create settings with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default font.
    pub fn with_default_font(mut self, font: impl Into<String>) -> Self {
        self.default_font = font.into();
        self
    }

    /// Load settings from a JSON document. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        if settings.default_font.trim().is_empty() {
            return Err(Error::InvalidOptions("default_font must not be empty".into()));
        }
        Ok(settings)
    }

    /// Resolve an optional override against the default font.
    pub fn font_or_default<'a>(&'a self, font: Option<&'a str>) -> &'a str {
        font.unwrap_or(self.default_font.as_str())
    }
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            default_font: DEFAULT_FONT.to_string(),
        }
    }
}

/// Options for a recognition pass over every page.
#[derive(Debug, Clone)]
pub struct RecognizeOptions {
    /// Run the legacy (fast) engine
    pub legacy: bool,

    /// Run the LSTM (accurate) engine
    pub lstm: bool,

    /// Treat the first-phase result as the source of document metrics
    pub main_data: bool,

    /// Engine parameters forwarded to the backend untouched
    pub engine_params: serde_json::Value,
}

impl RecognizeOptions {
    /// Create options with defaults (both engines).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the legacy engine.
    pub fn with_legacy(mut self, legacy: bool) -> Self {
        self.legacy = legacy;
        self
    }

    /// Enable or disable the LSTM engine.
    pub fn with_lstm(mut self, lstm: bool) -> Self {
        self.lstm = lstm;
        self
    }

    /// Legacy engine only.
    pub fn legacy_only(mut self) -> Self {
        self.legacy = true;
        self.lstm = false;
        self
    }

    /// LSTM engine only.
    pub fn lstm_only(mut self) -> Self {
        self.legacy = false;
        self.lstm = true;
        self
    }

    /// Flag results as main data.
    pub fn with_main_data(mut self, main_data: bool) -> Self {
        self.main_data = main_data;
        self
    }

    /// Set backend engine parameters.
    pub fn with_engine_params(mut self, params: serde_json::Value) -> Self {
        self.engine_params = params;
        self
    }

    /// Whether both engines are requested.
    pub fn is_dual(&self) -> bool {
        self.legacy && self.lstm
    }

    /// Check that at least one engine is requested.
    pub fn validate(&self) -> Result<()> {
        if !self.legacy && !self.lstm {
            return Err(Error::InvalidOptions(
                "at least one recognition engine must be requested".into(),
            ));
        }
        Ok(())
    }
}

impl Default for RecognizeOptions {
    fn default() -> Self {
        Self {
            legacy: true,
            lstm: true,
            main_data: false,
            engine_params: serde_json::Value::Null,
        }
    }
}

/// Raw OCR formats that can be converted into pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    /// hOCR (Tesseract)
    Hocr,
    /// Abbyy XML
    Abbyy,
    /// mupdf structured text
    Stext,
}

impl ImportFormat {
    /// Backend job that converts this format.
    pub fn job_name(&self) -> &'static str {
        match self {
            ImportFormat::Hocr => "convertPageHocr",
            ImportFormat::Abbyy => "convertPageAbbyy",
            ImportFormat::Stext => "convertPageStext",
        }
    }
}

impl FromStr for ImportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hocr" => Ok(ImportFormat::Hocr),
            "abbyy" => Ok(ImportFormat::Abbyy),
            "stext" => Ok(ImportFormat::Stext),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImportFormat::Hocr => "hocr",
            ImportFormat::Abbyy => "abbyy",
            ImportFormat::Stext => "stext",
        };
        f.write_str(name)
    }
}
