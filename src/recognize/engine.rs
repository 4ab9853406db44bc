//! Engines, backend seam and per-page job results.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::Result;
use crate::model::{BBox, Page};

/// Identifies a result store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineId {
    /// Tesseract legacy engine (fast)
    Legacy,
    /// Tesseract LSTM engine (accurate)
    Lstm,
    /// Most recent result of either primary engine
    Latest,
    /// Imported or otherwise named data
    Named(String),
}

impl EngineId {
    /// Whether this is one of the two recognition engines.
    pub fn is_primary(&self) -> bool {
        matches!(self, EngineId::Legacy | EngineId::Lstm)
    }

    /// The other primary engine.
    pub fn other_primary(&self) -> Option<EngineId> {
        match self {
            EngineId::Legacy => Some(EngineId::Lstm),
            EngineId::Lstm => Some(EngineId::Legacy),
            _ => None,
        }
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineId::Legacy => f.write_str("Tesseract Legacy"),
            EngineId::Lstm => f.write_str("Tesseract LSTM"),
            EngineId::Latest => f.write_str("Tesseract Latest"),
            EngineId::Named(name) => f.write_str(name),
        }
    }
}

/// An auto-detected layout region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    /// Region bounds
    pub bbox: BBox,
    /// Region kind (e.g. "order", "exclude")
    pub kind: String,
}

/// Layout regions of a page keyed by region id.
pub type LayoutBoxes = BTreeMap<String, LayoutBox>;

/// Output of converting one page from one engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedPage {
    /// The recognized page
    pub page: Page,
    /// Engine font metrics, opaque to this crate
    #[serde(default)]
    pub font_metrics: serde_json::Value,
    /// Detected layout regions
    #[serde(default)]
    pub layout_boxes: LayoutBoxes,
    /// Per-character warnings
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl ConvertedPage {
    /// Wrap a page with no metrics, layout or warnings.
    pub fn new(page: Page) -> Self {
        Self {
            page,
            font_metrics: serde_json::Value::Null,
            layout_boxes: LayoutBoxes::new(),
            warnings: Vec::new(),
        }
    }
}

/// Pending result of one engine on one page.
pub type EngineResult = oneshot::Receiver<Result<ConvertedPage>>;

/// Payload of a conversion job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    /// Raw OCR text for one page
    pub ocr_str: String,
    /// Page index
    pub n: usize,
}

/// The worker pool that runs recognition and conversion jobs.
///
/// Parallelism is bounded by the implementation, not by the caller.
#[async_trait]
pub trait RecognitionBackend: Send + Sync {
    /// Resolve once workers can accept jobs.
    async fn ready(&self) -> Result<()>;

    /// Start recognition of one page.
    ///
    /// Returns one pending result per requested engine: legacy first, then
    /// LSTM. Results may complete in any order.
    async fn recognize_page(
        &self,
        n: usize,
        legacy: bool,
        lstm: bool,
        params: &serde_json::Value,
    ) -> Result<Vec<EngineResult>>;

    /// Run a named job and wait for its result.
    async fn submit_job(&self, name: &str, payload: JobPayload) -> Result<ConvertedPage>;
}
