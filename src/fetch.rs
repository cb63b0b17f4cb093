//! Page fetching against the upstream search endpoint.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::models::PageResult;

/// One page request against the upstream catalog.
///
/// The ingestion loop only sees this trait, so tests run it against
/// scripted pages instead of the network.
pub trait FetchPages {
    /// Fetch page `page` (1-based). Errors are not retried here; the
    /// caller decides what a failed page means for the run.
    fn fetch(&mut self, page: u64) -> Result<PageResult>;
}

/// Blocking HTTP fetcher for the paginated search endpoint.
pub struct HttpPageFetcher {
    base_url: String,
    page_size: u32,
    timeout: Duration,
    client: Option<Client>,
}

impl HttpPageFetcher {
    pub fn new(base_url: impl Into<String>, page_size: u32, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            page_size,
            timeout,
            client: None,
        }
    }

    /// Lazy HTTP client, created on first use.
    fn client(&mut self) -> &Client {
        if self.client.is_none() {
            self.client = Some(
                Client::builder()
                    .timeout(self.timeout)
                    .redirect(reqwest::redirect::Policy::limited(10))
                    .build()
                    .expect("failed to build HTTP client"),
            );
        }
        self.client.as_ref().unwrap()
    }

    /// Request URL for one page: base query plus `page_size` and `page`.
    pub fn page_url(&self, page: u64) -> String {
        format!(
            "{}&page_size={}&page={}",
            self.base_url, self.page_size, page
        )
    }
}

impl FetchPages for HttpPageFetcher {
    fn fetch(&mut self, page: u64) -> Result<PageResult> {
        let url = self.page_url(page);
        debug!(url = %url, "requesting page");
        let resp = self.client().get(&url).send()?.error_for_status()?;
        let body: Value = resp.json()?;
        Ok(parse_page(&body))
    }
}

/// Decode the upstream JSON envelope into raw records.
///
/// A missing or non-array `products` field counts as an empty page, not an
/// error, so a malformed-but-empty final page still terminates the run
/// cleanly.
pub fn parse_page(body: &Value) -> PageResult {
    let records = match body.get("products") {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    let count = records.len();
    PageResult { records, count }
}
