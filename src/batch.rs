//! Cross-page buffering of normalized products.

use crate::models::Product;

/// Ordered, append-only buffer of products awaiting a flush.
///
/// Holds records across multiple pages until the ingestion loop drains it
/// into the store. No deduplication happens here: duplicate barcodes within
/// one batch are both forwarded, and the store's upsert makes the later
/// write win.
#[derive(Debug, Default)]
pub struct BatchAccumulator {
    buf: Vec<Product>,
}

impl BatchAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, product: Product) {
        self.buf.push(product);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Take all buffered products, leaving the accumulator empty.
    pub fn drain(&mut self) -> Vec<Product> {
        std::mem::take(&mut self.buf)
    }
}
