use std::time::Duration;

/// Base query for the OpenFoodFacts search endpoint. Page size and page
/// number are appended per request.
pub const SEARCH_URL: &str = "https://world.openfoodfacts.org/cgi/search.pl?search_terms=&search_simple=1&action=process&json=1";

pub const DEFAULT_PAGE_SIZE: u32 = 1000;
pub const DEFAULT_START_PAGE: u64 = 1;
pub const DEFAULT_FLUSH_EVERY_PAGES: u64 = 10;
pub const DEFAULT_PAUSE_EVERY_PAGES: u64 = 10;
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(60);
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Tuning knobs for one ingestion run.
///
/// Everything the loop needs is injected through this struct; nothing is
/// hardcoded inside the loop itself.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Base search URL, without `page_size` or `page` parameters.
    pub base_url: String,
    /// Records requested per page.
    pub page_size: u32,
    /// First page to fetch. Page numbering is 1-based upstream.
    pub start_page: u64,
    /// Flush the accumulator after this many fetched pages. `0` disables
    /// interval flushing; the batch then flushes only before pauses and at
    /// the end of the run.
    pub flush_every_pages: u64,
    /// Pause after this many fetched pages. `0` disables pausing.
    pub pause_every_pages: u64,
    /// How long each rate-limit pause lasts.
    pub pause: Duration,
    /// HTTP request timeout for page fetches.
    pub http_timeout: Duration,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            base_url: SEARCH_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            start_page: DEFAULT_START_PAGE,
            flush_every_pages: DEFAULT_FLUSH_EVERY_PAGES,
            pause_every_pages: DEFAULT_PAUSE_EVERY_PAGES,
            pause: DEFAULT_PAUSE,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}
