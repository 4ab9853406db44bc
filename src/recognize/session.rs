//! Session state that recognition results are applied to.

use std::collections::HashMap;

use crossbeam_channel::{Sender, TrySendError};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Dimensions, Page};

use super::engine::{ConvertedPage, EngineId, LayoutBoxes};

/// Per-page metrics recorded from main data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMetrics {
    /// Image dimensions
    pub dims: Dimensions,
    /// Skew angle in degrees
    pub angle: f64,
    /// Horizontal offset of the text block
    pub left: f64,
}

impl PageMetrics {
    /// Metrics for a page of the given size, with no skew or offset.
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            angle: 0.0,
            left: 0.0,
        }
    }
}

/// Aggregate metrics over every page with a metrics record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetrics {
    /// Mean skew angle
    pub mean_angle: f64,
    /// Mean horizontal offset
    pub mean_left: f64,
    /// Pages contributing
    pub pages: usize,
}

/// Notifications for a renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayEvent {
    /// The displayed page has new data and should be redrawn.
    Refresh {
        /// Page index
        page: usize,
    },
    /// A result was applied to a page.
    Applied {
        /// Page index
        page: usize,
        /// Engine the result came from
        engine: EngineId,
    },
}

/// Explicit context for a document's recognition state.
///
/// Every store is indexed by page. The [`EngineId::Latest`] store mirrors
/// whichever primary engine wrote to a page most recently.
#[derive(Debug)]
pub struct Session {
    page_count: usize,

    /// Page currently displayed
    pub current_page: usize,

    /// Store currently selected for display
    pub active_engine: Option<EngineId>,

    stores: HashMap<EngineId, Vec<Option<Page>>>,

    /// Engine font metrics from main data
    pub font_metrics: Vec<Option<serde_json::Value>>,

    /// Per-character warnings from main data
    pub warnings: Vec<Vec<String>>,

    /// Per-page metrics
    pub page_metrics: Vec<Option<PageMetrics>>,

    /// Layout regions
    pub layout: Vec<LayoutBoxes>,

    /// Whether structured text exists for the page
    pub structured_text: Vec<bool>,

    /// Aggregate metrics, once calculated
    pub document_metrics: Option<DocumentMetrics>,

    events: Option<Sender<DisplayEvent>>,
}

impl Session {
    /// Create a session for a document with `page_count` pages.
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            current_page: 0,
            active_engine: None,
            stores: HashMap::new(),
            font_metrics: vec![None; page_count],
            warnings: vec![Vec::new(); page_count],
            page_metrics: vec![None; page_count],
            layout: vec![LayoutBoxes::new(); page_count],
            structured_text: vec![false; page_count],
            document_metrics: None,
            events: None,
        }
    }

    /// Send display events to `sender`.
    ///
    /// Events are sent without blocking, so `sender` should be unbounded;
    /// on a full bounded channel the event is dropped and logged.
    pub fn with_events(mut self, sender: Sender<DisplayEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Create an empty store for `engine` if none exists.
    pub fn init_engine(&mut self, engine: &EngineId) {
        let count = self.page_count;
        self.stores
            .entry(engine.clone())
            .or_insert_with(|| vec![None; count]);
    }

    /// Whether a store exists for `engine`.
    pub fn has_engine(&self, engine: &EngineId) -> bool {
        self.stores.contains_key(engine)
    }

    /// Select the store to display.
    pub fn set_active_engine(&mut self, engine: EngineId) {
        log::debug!("Displaying {}", engine);
        self.active_engine = Some(engine);
    }

    /// Result of `engine` for page `n`.
    pub fn page(&self, engine: &EngineId, n: usize) -> Option<&Page> {
        self.stores.get(engine)?.get(n)?.as_ref()
    }

    /// Result of `engine` for page `n`, for editing.
    pub fn page_mut(&mut self, engine: &EngineId, n: usize) -> Option<&mut Page> {
        self.stores.get_mut(engine)?.get_mut(n)?.as_mut()
    }

    /// Most recent primary-engine result for page `n`.
    pub fn latest(&self, n: usize) -> Option<&Page> {
        self.page(&EngineId::Latest, n)
    }

    /// Whether a result just applied to page `n` by `engine` must be redrawn.
    ///
    /// Only the displayed page is redrawn, and only when `engine` is the
    /// displayed store, or it is a primary engine and either the mirrored
    /// store is displayed or the other primary engine has no result for the
    /// page yet.
    pub fn should_refresh(&self, n: usize, engine: &EngineId) -> bool {
        if n != self.current_page {
            return false;
        }
        if self.active_engine.as_ref() == Some(engine) {
            return true;
        }
        if !engine.is_primary() {
            return false;
        }
        let mirrored_active = self.active_engine == Some(EngineId::Latest);
        let other_missing = engine
            .other_primary()
            .map(|other| self.page(&other, n).is_none())
            .unwrap_or(true);
        mirrored_active || other_missing
    }

    /// Apply one engine's result for page `n`.
    ///
    /// Returns whether a refresh was requested.
    pub fn apply_result(
        &mut self,
        result: ConvertedPage,
        n: usize,
        main_data: bool,
        engine: &EngineId,
    ) -> Result<bool> {
        if n >= self.page_count {
            return Err(Error::PageOutOfRange(n, self.page_count));
        }

        let ConvertedPage {
            page,
            font_metrics,
            layout_boxes,
            warnings,
        } = result;

        if main_data {
            self.font_metrics[n] = Some(font_metrics);
            self.warnings[n] = warnings;

            // A record may already exist from another source; keep it.
            let metrics = self.page_metrics[n].get_or_insert_with(|| PageMetrics::new(page.dims));
            metrics.angle = page.angle;
            metrics.left = page.left;
        }

        if engine.is_primary() {
            self.store_mut(&EngineId::Latest)[n] = Some(page.clone());
        }
        self.store_mut(engine)[n] = Some(page);

        self.structured_text[n] = true;

        if self.layout[n].is_empty() {
            self.layout[n] = layout_boxes;
        }

        let refresh = self.should_refresh(n, engine);
        if refresh {
            self.emit(DisplayEvent::Refresh { page: n });
        }
        self.emit(DisplayEvent::Applied {
            page: n,
            engine: engine.clone(),
        });

        log::debug!("Applied {} result to page {}", engine, n);
        Ok(refresh)
    }

    /// Average skew and offset over pages with metrics.
    pub fn aggregate_metrics(&mut self) -> Option<&DocumentMetrics> {
        let recorded: Vec<&PageMetrics> = self.page_metrics.iter().flatten().collect();
        if recorded.is_empty() {
            self.document_metrics = None;
            return None;
        }
        let count = recorded.len() as f64;
        let metrics = DocumentMetrics {
            mean_angle: recorded.iter().map(|m| m.angle).sum::<f64>() / count,
            mean_left: recorded.iter().map(|m| m.left).sum::<f64>() / count,
            pages: recorded.len(),
        };
        log::info!(
            "Document metrics over {} pages: angle {:.3}, left {:.1}",
            metrics.pages,
            metrics.mean_angle,
            metrics.mean_left
        );
        self.document_metrics = Some(metrics);
        self.document_metrics.as_ref()
    }

    fn store_mut(&mut self, engine: &EngineId) -> &mut Vec<Option<Page>> {
        let count = self.page_count;
        self.stores
            .entry(engine.clone())
            .or_insert_with(|| vec![None; count])
    }

    fn emit(&self, event: DisplayEvent) {
        if let Some(sender) = &self.events {
            match sender.try_send(event) {
                Ok(()) => {}
                Err(TrySendError::Full(event)) => {
                    log::debug!("Display event channel full, dropping {:?}", event);
                }
                // A renderer that went away is not an error for recognition.
                Err(TrySendError::Disconnected(_)) => {}
            }
        }
    }
}
