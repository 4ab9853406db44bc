//! Dispatch of per-page recognition and conversion jobs.
//!
//! One task is spawned per page. Tasks only wait on the backend and forward
//! what they receive over a channel; the coordinating flow is the sole
//! writer of the [`Session`]. Within a page the legacy result is forwarded
//! before the LSTM result is even awaited, so the mirrored store can never
//! see an LSTM result overwritten by a late legacy one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::options::{ImportFormat, RecognizeOptions};

use super::engine::{ConvertedPage, EngineId, EngineResult, JobPayload, RecognitionBackend};
use super::session::Session;

/// Progress of one page through recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageJobState {
    /// No job dispatched
    NotStarted,
    /// Waiting on the legacy engine
    LegacyRequested,
    /// Legacy result resolved
    LegacyDone,
    /// Waiting on the LSTM engine
    LstmRequested,
    /// LSTM result resolved
    LstmDone,
    /// Waiting on a conversion job
    ConvertRequested,
    /// Conversion resolved
    ConvertDone,
}

/// A page job that did not produce a usable result.
#[derive(Debug)]
pub struct PageFailure {
    /// Page index
    pub page: usize,
    /// Engine the job ran for
    pub engine: EngineId,
    /// What went wrong
    pub error: Error,
}

/// Outcome of a run over every page.
///
/// A resolved state means the phase finished, successfully or not;
/// failures are listed separately.
#[derive(Debug)]
pub struct RecognitionReport {
    /// Final state per page
    pub pages: Vec<PageJobState>,
    /// Every state each page passed through, in order
    pub history: Vec<Vec<PageJobState>>,
    /// Failed jobs
    pub failures: Vec<PageFailure>,
}

impl RecognitionReport {
    fn new(page_count: usize) -> Self {
        Self {
            pages: vec![PageJobState::NotStarted; page_count],
            history: vec![Vec::new(); page_count],
            failures: Vec::new(),
        }
    }

    /// Whether every job succeeded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Indices of pages with at least one failed job.
    pub fn failed_pages(&self) -> Vec<usize> {
        let mut pages: Vec<usize> = self.failures.iter().map(|f| f.page).collect();
        pages.sort_unstable();
        pages.dedup();
        pages
    }

    fn advance(&mut self, page: usize, state: PageJobState) {
        self.pages[page] = state;
        self.history[page].push(state);
    }

    fn record_failure(&mut self, page: usize, engine: EngineId, error: Error) {
        log::warn!("{} job for page {} failed: {}", engine, page, error);
        self.failures.push(PageFailure {
            page,
            engine,
            error,
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    First,
    Second,
}

struct PageEvent {
    page: usize,
    phase: Phase,
    engine: EngineId,
    outcome: Result<ConvertedPage>,
}

async fn resolve(pending: Option<EngineResult>, n: usize, engine: &EngineId) -> Result<ConvertedPage> {
    match pending {
        Some(rx) => rx.await.map_err(|_| Error::JobDropped(n))?,
        None => Err(Error::JobFailed(format!(
            "backend returned no {} result for page {}",
            engine, n
        ))),
    }
}

/// Recognize every page of the session.
///
/// Returns after every requested engine has resolved on every page. When
/// both engines run, the first phase (legacy) completes everywhere before
/// the aggregate metrics are calculated, without waiting for LSTM. Failed
/// page jobs are collected in the report; only a backend that never becomes
/// ready fails the whole call.
pub async fn recognize_all_pages(
    backend: Arc<dyn RecognitionBackend>,
    session: &mut Session,
    options: &RecognizeOptions,
) -> Result<RecognitionReport> {
    options.validate()?;

    if options.legacy {
        session.init_engine(&EngineId::Legacy);
        session.set_active_engine(EngineId::Legacy);
    }
    if options.lstm {
        session.init_engine(&EngineId::Lstm);
        session.set_active_engine(EngineId::Lstm);
    }
    // Shown while recognition runs; never an editable store afterwards.
    session.init_engine(&EngineId::Latest);
    session.set_active_engine(EngineId::Latest);

    backend
        .ready()
        .await
        .map_err(|e| Error::PoolUnavailable(e.to_string()))?;

    let page_count = session.page_count();
    let dual = options.is_dual();
    let first_engine = if options.legacy {
        EngineId::Legacy
    } else {
        EngineId::Lstm
    };
    let first_requested = if options.legacy {
        PageJobState::LegacyRequested
    } else {
        PageJobState::LstmRequested
    };

    let mut report = RecognitionReport::new(page_count);
    let (tx, mut rx) = mpsc::unbounded_channel::<PageEvent>();
    let mut tasks = Vec::with_capacity(page_count);

    log::info!(
        "Recognizing {} pages (legacy: {}, lstm: {})",
        page_count,
        options.legacy,
        options.lstm
    );

    for n in 0..page_count {
        report.advance(n, first_requested);

        let backend = Arc::clone(&backend);
        let tx = tx.clone();
        let params = options.engine_params.clone();
        let (legacy, lstm) = (options.legacy, options.lstm);
        let first_engine = first_engine.clone();

        tasks.push(tokio::spawn(async move {
            let mut pending = match backend.recognize_page(n, legacy, lstm, &params).await {
                Ok(results) => results.into_iter(),
                Err(e) => {
                    let message = e.to_string();
                    let _ = tx.send(PageEvent {
                        page: n,
                        phase: Phase::First,
                        engine: first_engine,
                        outcome: Err(e),
                    });
                    if dual {
                        let _ = tx.send(PageEvent {
                            page: n,
                            phase: Phase::Second,
                            engine: EngineId::Lstm,
                            outcome: Err(Error::JobFailed(message)),
                        });
                    }
                    return;
                }
            };

            let outcome = resolve(pending.next(), n, &first_engine).await;
            let _ = tx.send(PageEvent {
                page: n,
                phase: Phase::First,
                engine: first_engine,
                outcome,
            });

            if dual {
                let outcome = resolve(pending.next(), n, &EngineId::Lstm).await;
                let _ = tx.send(PageEvent {
                    page: n,
                    phase: Phase::Second,
                    engine: EngineId::Lstm,
                    outcome,
                });
            }
        }));
    }
    drop(tx);

    let mut first_pending = vec![true; page_count];
    let mut second_pending = vec![dual; page_count];
    let mut first_remaining = page_count;
    let mut second_remaining = if dual { page_count } else { 0 };
    let mut aggregated = false;

    loop {
        if first_remaining == 0 && !aggregated {
            aggregated = true;
            log::debug!("First phase resolved on all pages");
            if options.main_data {
                session.aggregate_metrics();
            }
        }
        if first_remaining == 0 && second_remaining == 0 {
            break;
        }

        let Some(event) = rx.recv().await else {
            // Every task is gone; whatever is still pending will never arrive.
            for n in 0..page_count {
                if first_pending[n] {
                    report.record_failure(n, first_engine.clone(), Error::JobDropped(n));
                }
                if second_pending[n] {
                    report.record_failure(n, EngineId::Lstm, Error::JobDropped(n));
                }
            }
            if options.main_data && !aggregated {
                session.aggregate_metrics();
            }
            break;
        };

        let PageEvent {
            page,
            phase,
            engine,
            outcome,
        } = event;

        let main_data = options.main_data && phase == Phase::First && engine == EngineId::Legacy;
        match outcome {
            Ok(result) => {
                if let Err(e) = session.apply_result(result, page, main_data, &engine) {
                    report.record_failure(page, engine.clone(), e);
                }
            }
            Err(e) => report.record_failure(page, engine.clone(), e),
        }

        match phase {
            Phase::First => {
                first_pending[page] = false;
                first_remaining -= 1;
                if engine == EngineId::Legacy {
                    report.advance(page, PageJobState::LegacyDone);
                    if dual {
                        report.advance(page, PageJobState::LstmRequested);
                    }
                } else {
                    report.advance(page, PageJobState::LstmDone);
                }
            }
            Phase::Second => {
                second_pending[page] = false;
                second_remaining -= 1;
                report.advance(page, PageJobState::LstmDone);
            }
        }
    }

    for task in tasks {
        if let Err(e) = task.await {
            log::warn!("Recognition task ended abnormally: {}", e);
        }
    }

    session.set_active_engine(if options.lstm {
        EngineId::Lstm
    } else {
        EngineId::Legacy
    });

    log::info!(
        "Recognition finished: {} pages, {} failed jobs",
        page_count,
        report.failures.len()
    );
    Ok(report)
}

/// Convert raw OCR text for every page and apply it under `engine`.
///
/// `raw_pages[n]` is converted for page `n`. Conversions run concurrently
/// and are applied as they finish.
pub async fn import_pages(
    backend: Arc<dyn RecognitionBackend>,
    session: &mut Session,
    raw_pages: Vec<String>,
    format: ImportFormat,
    main_data: bool,
    engine: EngineId,
) -> Result<RecognitionReport> {
    if raw_pages.len() > session.page_count() {
        return Err(Error::PageOutOfRange(
            raw_pages.len() - 1,
            session.page_count(),
        ));
    }

    backend
        .ready()
        .await
        .map_err(|e| Error::PoolUnavailable(e.to_string()))?;
    session.init_engine(&engine);

    let page_count = raw_pages.len();
    let mut report = RecognitionReport::new(session.page_count());
    let (tx, mut rx) = mpsc::unbounded_channel::<(usize, Result<ConvertedPage>)>();
    let mut tasks = Vec::with_capacity(page_count);

    log::info!("Importing {} pages as {} ({})", page_count, engine, format);

    for (n, ocr_str) in raw_pages.into_iter().enumerate() {
        report.advance(n, PageJobState::ConvertRequested);
        let backend = Arc::clone(&backend);
        let tx = tx.clone();
        tasks.push(tokio::spawn(async move {
            let outcome = backend
                .submit_job(format.job_name(), JobPayload { ocr_str, n })
                .await;
            let _ = tx.send((n, outcome));
        }));
    }
    drop(tx);

    let mut pending = vec![true; page_count];
    while let Some((n, outcome)) = rx.recv().await {
        pending[n] = false;
        report.advance(n, PageJobState::ConvertDone);
        match outcome {
            Ok(result) => {
                if let Err(e) = session.apply_result(result, n, main_data, &engine) {
                    report.record_failure(n, engine.clone(), e);
                }
            }
            Err(e) => report.record_failure(n, engine.clone(), e),
        }
    }
    for (n, missing) in pending.into_iter().enumerate() {
        if missing {
            report.record_failure(n, engine.clone(), Error::JobDropped(n));
        }
    }

    for task in tasks {
        if let Err(e) = task.await {
            log::warn!("Conversion task ended abnormally: {}", e);
        }
    }

    Ok(report)
}
