//! Batch accumulator tests.

mod common;

use foodfacts_ingest::{normalize, BatchAccumulator};

#[test]
fn add_grows_the_buffer_in_order() {
    let mut batch = BatchAccumulator::new();
    assert!(batch.is_empty());

    batch.add(normalize(&common::raw_record("1", "first", 10)));
    batch.add(normalize(&common::raw_record("2", "second", 20)));
    assert_eq!(batch.len(), 2);

    let drained = batch.drain();
    assert_eq!(drained[0].barcode, 1);
    assert_eq!(drained[1].barcode, 2);
}

#[test]
fn drain_empties_the_buffer() {
    let mut batch = BatchAccumulator::new();
    batch.add(normalize(&common::raw_record("1", "only", 0)));

    assert_eq!(batch.drain().len(), 1);
    assert!(batch.is_empty());
    assert!(batch.drain().is_empty());
}

#[test]
fn duplicate_barcodes_are_kept_not_deduplicated() {
    let mut batch = BatchAccumulator::new();
    batch.add(normalize(&common::raw_record("42", "old name", 1)));
    batch.add(normalize(&common::raw_record("42", "new name", 2)));

    let drained = batch.drain();
    assert_eq!(drained.len(), 2);
    assert_eq!(drained[0].name, "old name");
    assert_eq!(drained[1].name, "new name");
}
