//! Paginated product ingestion from the OpenFoodFacts search API.
//!
//! Walks the upstream catalog page by page, normalizes each raw record,
//! batches rows across pages, and bulk-upserts them into a local DuckDB
//! store, pausing after every Nth page so the upstream API is not hammered.
//! Re-running over the same catalog is idempotent: the barcode is the
//! natural key and re-ingestion overwrites in place.
//!
//! # Quick start
//!
//! ```no_run
//! use foodfacts_ingest::{CancelToken, Ingestor};
//!
//! let mut ingestor = Ingestor::builder()
//!     .db_path("products.duckdb")
//!     .page_size(1000)
//!     .build()
//!     .unwrap();
//!
//! let token = CancelToken::new();
//! let report = ingestor.run(&token);
//! println!("{} records over {} pages", report.records_flushed, report.pages_fetched);
//! ```
//!
//! A run ends in one of three ways: [`RunOutcome::Completed`] when an empty
//! page signals catalog exhaustion, [`RunOutcome::Cancelled`] when the
//! token is cancelled (clean partial completion, usable from another thread
//! even mid-pause), or [`RunOutcome::Failed`] on a fetch or persistence
//! error. Every report carries the last durably flushed page as a resume
//! hint.

pub mod batch;
pub mod config;
pub mod error;
pub mod fetch;
pub mod ingest;
pub mod limiter;
pub mod models;
pub mod normalize;
pub mod store;

pub use batch::BatchAccumulator;
pub use config::IngestConfig;
pub use error::{IngestError, Result};
pub use fetch::{FetchPages, HttpPageFetcher};
pub use ingest::{IngestRunner, RunOutcome, RunReport};
pub use limiter::{CancelToken, RateLimiter};
pub use models::{PageResult, Product};
pub use normalize::normalize;
pub use store::{DuckDbStore, ProductStore};

use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// IngestorBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`Ingestor`].
///
/// Use [`Ingestor::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](IngestorBuilder::build).
#[derive(Default)]
pub struct IngestorBuilder {
    config: IngestConfig,
    db_path: Option<PathBuf>,
}

impl IngestorBuilder {
    /// Store the ingested products in a DuckDB database at `path`.
    ///
    /// Without this, an in-memory database is used and contents are lost
    /// when the ingestor is dropped.
    pub fn db_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.db_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Base search URL, without `page_size` or `page` parameters.
    ///
    /// Defaults to the OpenFoodFacts search endpoint.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Records requested per page. Defaults to 1000.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size;
        self
    }

    /// First page to fetch (1-based). Defaults to 1; set higher to resume
    /// a run that previously failed partway through.
    pub fn start_page(mut self, page: u64) -> Self {
        self.config.start_page = page;
        self
    }

    /// Flush the batch to the store after this many pages. Defaults to 10.
    pub fn flush_every_pages(mut self, pages: u64) -> Self {
        self.config.flush_every_pages = pages;
        self
    }

    /// Pause after this many pages. Defaults to 10.
    pub fn pause_every_pages(mut self, pages: u64) -> Self {
        self.config.pause_every_pages = pages;
        self
    }

    /// Duration of each rate-limit pause. Defaults to 60 seconds.
    pub fn pause(mut self, pause: Duration) -> Self {
        self.config.pause = pause;
        self
    }

    /// HTTP request timeout for page fetches. Defaults to 120 seconds.
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    /// Build the ingestor, opening the DuckDB store.
    ///
    /// No network traffic happens here; pages are fetched only once
    /// [`Ingestor::run`] is called.
    pub fn build(self) -> Result<Ingestor> {
        let store = match &self.db_path {
            Some(path) => DuckDbStore::open(path)?,
            None => DuckDbStore::open_in_memory()?,
        };
        let fetcher = HttpPageFetcher::new(
            self.config.base_url.clone(),
            self.config.page_size,
            self.config.http_timeout,
        );
        Ok(Ingestor {
            runner: IngestRunner::new(fetcher, store, self.config),
        })
    }
}

// ---------------------------------------------------------------------------
// Ingestor
// ---------------------------------------------------------------------------

/// The main entry point: an HTTP page fetcher wired to a DuckDB store.
///
/// Intended to be invoked as a startup task or triggerable job by the
/// surrounding application; there is no CLI surface. For custom fetchers or
/// stores, use [`IngestRunner`] directly.
pub struct Ingestor {
    runner: IngestRunner<HttpPageFetcher, DuckDbStore>,
}

impl Ingestor {
    /// Create a new builder for configuring an ingestor.
    pub fn builder() -> IngestorBuilder {
        IngestorBuilder::default()
    }

    /// Run one ingestion pass to completion, failure, or cancellation.
    ///
    /// Blocks the calling thread for the whole run, rate-limit pauses
    /// included. Cancel via a clone of `token` from another thread.
    pub fn run(&mut self, token: &CancelToken) -> RunReport {
        self.runner.run(token)
    }

    /// Consume the ingestor and hand back its store.
    pub fn into_store(self) -> DuckDbStore {
        self.runner.into_store()
    }
}
