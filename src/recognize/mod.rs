//! Recognition job coordination.
//!
//! Pages are recognized independently by one or two engines. With both
//! engines, every page first receives the fast legacy result and later the
//! LSTM result; callers can see the legacy pass everywhere well before the
//! slower engine finishes.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ocrdoc::recognize::{recognize_all_pages, RecognitionBackend, Session};
//! use ocrdoc::RecognizeOptions;
//!
//! async fn run(backend: Arc<dyn RecognitionBackend>) -> ocrdoc::Result<()> {
//!     let mut session = Session::new(3);
//!     let options = RecognizeOptions::new().with_main_data(true);
//!     let report = recognize_all_pages(backend, &mut session, &options).await?;
//!     for failure in &report.failures {
//!         eprintln!("page {}: {}", failure.page, failure.error);
//!     }
//!     Ok(())
//! }
//! ```

mod coordinator;
mod engine;
mod session;

pub use coordinator::{
    import_pages, recognize_all_pages, PageFailure, PageJobState, RecognitionReport,
};
pub use engine::{
    ConvertedPage, EngineId, EngineResult, JobPayload, LayoutBox, LayoutBoxes,
    RecognitionBackend,
};
pub use session::{DisplayEvent, DocumentMetrics, PageMetrics, Session};
