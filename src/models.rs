use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Product — normalized catalog entry (persisted)
// ---------------------------------------------------------------------------

/// One normalized product row, keyed by barcode.
///
/// Constructed once per raw upstream record by
/// [`normalize`](crate::normalize::normalize) and immutable afterwards;
/// ownership transfers to the store at flush time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Product {
    /// Natural key. Re-ingesting a barcode overwrites, never duplicates.
    pub barcode: i64,
    /// Product name, at most 255 characters.
    pub name: String,
    /// Energy per 100 g, `0` when the upstream record carries none.
    pub kcal_per_100g: i32,
    /// Countries of origin, at most 255 characters.
    pub origin_country: String,
    /// Free-text ingredient list, untruncated.
    pub ingredients: String,
}

// ---------------------------------------------------------------------------
// PageResult — one decoded upstream page (ephemeral)
// ---------------------------------------------------------------------------

/// Raw records decoded from one upstream page, plus their count.
///
/// Only lives long enough for the loop to normalize the records and decide
/// whether to keep paging.
#[derive(Debug, Default)]
pub struct PageResult {
    pub records: Vec<serde_json::Value>,
    pub count: usize,
}

impl PageResult {
    /// An empty page is the ingestion loop's termination signal.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
