//! Shared fixtures for the ingestion integration tests.
//!
//! Provides a scripted [`FetchPages`] implementation serving pre-baked
//! pages and an overwrite-by-key [`ProductStore`] fake that records every
//! flush it receives.

#![allow(dead_code)]

use std::collections::HashMap;

use foodfacts_ingest::{
    CancelToken, FetchPages, IngestError, PageResult, Product, ProductStore, Result,
};
use serde_json::{json, Value};

/// Build a minimal raw upstream record.
pub fn raw_record(code: &str, name: &str, kcal: i64) -> Value {
    json!({
        "code": code,
        "product_name": name,
        "nutriments": { "energy-kcal_100g": kcal },
        "countries": "Austria",
        "ingredients_text": "water, sugar"
    })
}

/// Build `n_pages` pages of `per_page` records each, with unique barcodes.
pub fn pages_of(n_pages: usize, per_page: usize) -> Vec<Vec<Value>> {
    (0..n_pages)
        .map(|p| {
            (0..per_page)
                .map(|i| {
                    let code = (p * per_page + i + 1) as i64;
                    raw_record(&code.to_string(), &format!("product {code}"), 100)
                })
                .collect()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// ScriptedFetcher
// ---------------------------------------------------------------------------

/// Serves pre-baked pages by page number (1-based); any page past the
/// script is empty. Optionally fails on a given page or cancels a token
/// after serving a given page.
pub struct ScriptedFetcher {
    pages: Vec<Vec<Value>>,
    /// Every page number requested, in order.
    pub fetched: Vec<u64>,
    pub fail_on_page: Option<u64>,
    pub cancel_after: Option<(u64, CancelToken)>,
}

impl ScriptedFetcher {
    pub fn new(pages: Vec<Vec<Value>>) -> Self {
        Self {
            pages,
            fetched: Vec::new(),
            fail_on_page: None,
            cancel_after: None,
        }
    }

    pub fn failing_on(mut self, page: u64) -> Self {
        self.fail_on_page = Some(page);
        self
    }

    pub fn cancelling_after(mut self, page: u64, token: &CancelToken) -> Self {
        self.cancel_after = Some((page, token.clone()));
        self
    }
}

impl FetchPages for ScriptedFetcher {
    fn fetch(&mut self, page: u64) -> Result<PageResult> {
        self.fetched.push(page);
        if self.fail_on_page == Some(page) {
            return Err(IngestError::Fetch("injected fetch failure".into()));
        }
        let records = self
            .pages
            .get((page - 1) as usize)
            .cloned()
            .unwrap_or_default();
        if let Some((after, token)) = &self.cancel_after {
            if page == *after {
                token.cancel();
            }
        }
        let count = records.len();
        Ok(PageResult { records, count })
    }
}

// ---------------------------------------------------------------------------
// RecordingStore
// ---------------------------------------------------------------------------

/// Overwrite-by-key store fake.
///
/// Keeps the final state in a map keyed by barcode (later writes win),
/// records the size of every flush, and keeps every product ever forwarded
/// so tests can assert that intra-batch duplicates are not deduplicated
/// upstream of the store.
#[derive(Default)]
pub struct RecordingStore {
    pub rows: HashMap<i64, Product>,
    pub flush_sizes: Vec<usize>,
    pub forwarded: Vec<Product>,
    pub fail_on_flush: Option<usize>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `n`th flush call (1-based) with a persistence error.
    pub fn failing_on_flush(mut self, n: usize) -> Self {
        self.fail_on_flush = Some(n);
        self
    }
}

impl ProductStore for RecordingStore {
    fn upsert_all(&mut self, products: &[Product]) -> Result<usize> {
        if self.fail_on_flush == Some(self.flush_sizes.len() + 1) {
            return Err(IngestError::Persistence("injected flush failure".into()));
        }
        self.flush_sizes.push(products.len());
        for product in products {
            self.forwarded.push(product.clone());
            self.rows.insert(product.barcode, product.clone());
        }
        Ok(products.len())
    }
}
