//! The ingestion loop: fetch, normalize, accumulate, flush, pause.
//!
//! One sequential worker drives the whole run. Pages are fetched in order
//! with no upper bound; the first empty page ends the run. The accumulator
//! is always flushed before a rate-limit pause begins and once more at the
//! end of the run, so everything read before an idle period or exit is
//! durably persisted.

use tracing::{error, info};

use crate::batch::BatchAccumulator;
use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::fetch::FetchPages;
use crate::limiter::{CancelToken, RateLimiter};
use crate::normalize::normalize;
use crate::store::ProductStore;

// ---------------------------------------------------------------------------
// RunOutcome / RunReport
// ---------------------------------------------------------------------------

/// How an ingestion run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The catalog was exhausted: a fetched page yielded zero records.
    Completed,
    /// An operator cancelled the run between pages or during a pause.
    /// A clean partial completion, not a failure.
    Cancelled,
    /// A fetch or flush error ended the run. Errors are not re-raised past
    /// the loop; everything flushed before the failure stays persisted.
    Failed {
        error: IngestError,
        /// Inclusive page range whose records were read but never
        /// persisted, `None` when nothing was lost.
        lost_pages: Option<(u64, u64)>,
    },
}

/// Summary of one ingestion run.
#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Pages that yielded records. The terminating empty page is not
    /// counted.
    pub pages_fetched: u64,
    /// Total records handed to the store across all flushes.
    pub records_flushed: u64,
    /// Resume hint: every page up to and including this one is durably
    /// persisted, whatever the outcome.
    pub last_page_flushed: Option<u64>,
}

impl RunReport {
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, RunOutcome::Completed)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.outcome, RunOutcome::Cancelled)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, RunOutcome::Failed { .. })
    }
}

// ---------------------------------------------------------------------------
// IngestRunner
// ---------------------------------------------------------------------------

/// Drives one ingestion run over a page fetcher and a product store.
pub struct IngestRunner<F, S> {
    fetcher: F,
    store: S,
    config: IngestConfig,
}

impl<F: FetchPages, S: ProductStore> IngestRunner<F, S> {
    pub fn new(fetcher: F, store: S, config: IngestConfig) -> Self {
        Self {
            fetcher,
            store,
            config,
        }
    }

    /// Consume the runner and hand back the store, e.g. to inspect it
    /// after a run or reuse it for another one.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Consume the runner and hand back both collaborators.
    pub fn into_parts(self) -> (F, S) {
        (self.fetcher, self.store)
    }

    /// Run until the catalog is exhausted, a failure occurs, or the token
    /// is cancelled. Never panics and never returns an error directly; the
    /// report carries the outcome.
    pub fn run(&mut self, token: &CancelToken) -> RunReport {
        let limiter = RateLimiter::new(self.config.pause_every_pages, self.config.pause);
        let mut batch = BatchAccumulator::new();
        let mut page = self.config.start_page;
        let mut pages_fetched: u64 = 0;
        let mut records_flushed: u64 = 0;
        let mut last_page_flushed: Option<u64> = None;
        // First page whose records sit in the accumulator, unflushed.
        let mut batch_start_page: Option<u64> = None;

        info!(
            start_page = page,
            page_size = self.config.page_size,
            "starting ingestion run"
        );

        loop {
            if token.is_cancelled() {
                info!(next_page = page, "cancellation requested, stopping");
                let lost = batch_start_page.map(|start| (start, page - 1));
                return match self.flush(&mut batch) {
                    Ok(n) => {
                        if n > 0 {
                            records_flushed += n as u64;
                            last_page_flushed = Some(page - 1);
                        }
                        RunReport {
                            outcome: RunOutcome::Cancelled,
                            pages_fetched,
                            records_flushed,
                            last_page_flushed,
                        }
                    }
                    Err(error) => RunReport {
                        outcome: RunOutcome::Failed {
                            error,
                            lost_pages: lost,
                        },
                        pages_fetched,
                        records_flushed,
                        last_page_flushed,
                    },
                };
            }

            // FETCHING
            let page_result = match self.fetcher.fetch(page) {
                Ok(result) => result,
                Err(error) => {
                    error!(page, error = %error, "page fetch failed, ending run");
                    return RunReport {
                        outcome: RunOutcome::Failed {
                            error,
                            lost_pages: batch_start_page.map(|start| (start, page - 1)),
                        },
                        pages_fetched,
                        records_flushed,
                        last_page_flushed,
                    };
                }
            };
            info!(page, records = page_result.count, "fetched page");

            if page_result.is_empty() {
                // DONE: flush whatever partial batch remains
                let lost = batch_start_page.map(|start| (start, page - 1));
                return match self.flush(&mut batch) {
                    Ok(n) => {
                        if n > 0 {
                            records_flushed += n as u64;
                            last_page_flushed = Some(page - 1);
                        }
                        info!(
                            pages_fetched,
                            records_flushed, "catalog exhausted, run complete"
                        );
                        RunReport {
                            outcome: RunOutcome::Completed,
                            pages_fetched,
                            records_flushed,
                            last_page_flushed,
                        }
                    }
                    Err(error) => RunReport {
                        outcome: RunOutcome::Failed {
                            error,
                            lost_pages: lost,
                        },
                        pages_fetched,
                        records_flushed,
                        last_page_flushed,
                    },
                };
            }

            // NORMALIZING + ACCUMULATING
            if batch_start_page.is_none() {
                batch_start_page = Some(page);
            }
            for raw in &page_result.records {
                batch.add(normalize(raw));
            }
            pages_fetched += 1;

            // MAYBE_PAUSING: flush first, so everything read so far is
            // persisted before the worker idles
            let pause_due = limiter.pause_due(pages_fetched);
            let flush_due = self.config.flush_every_pages > 0
                && pages_fetched % self.config.flush_every_pages == 0;

            if pause_due || flush_due {
                let lost = batch_start_page.map(|start| (start, page));
                match self.flush(&mut batch) {
                    Ok(n) => {
                        if n > 0 {
                            records_flushed += n as u64;
                            last_page_flushed = Some(page);
                        }
                        batch_start_page = None;
                    }
                    Err(error) => {
                        error!(error = %error, "batch flush failed, ending run");
                        return RunReport {
                            outcome: RunOutcome::Failed {
                                error,
                                lost_pages: lost,
                            },
                            pages_fetched,
                            records_flushed,
                            last_page_flushed,
                        };
                    }
                }
            }

            if pause_due && limiter.pause(token) {
                info!("cancelled during pause, stopping");
                return RunReport {
                    outcome: RunOutcome::Cancelled,
                    pages_fetched,
                    records_flushed,
                    last_page_flushed,
                };
            }

            page += 1;
        }
    }

    fn flush(&mut self, batch: &mut BatchAccumulator) -> Result<usize> {
        let products = batch.drain();
        if products.is_empty() {
            return Ok(0);
        }
        let n = self.store.upsert_all(&products)?;
        info!(rows = n, "flushed batch");
        Ok(n)
    }
}
