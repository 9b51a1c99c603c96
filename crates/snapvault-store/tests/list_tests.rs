//! List operation integration tests
//!
//! Verifies the size accounting: per-snapshot size counts shared content
//! in every snapshot naming it, distinct_size is what pruning would
//! reclaim, and the sum of distinct sizes equals the store footprint.

mod common;

use common::{populate, take_snapshot};
use snapvault_store::ops;
use snapvault_store::Store;
use tempfile::TempDir;

#[test]
fn test_list_empty_store() {
    let store = Store::open_in_memory().unwrap();
    let report = ops::list(&store).unwrap();
    assert!(report.rows.is_empty());
    assert_eq!(report.total_size, 0);
}

#[test]
fn test_two_snapshots_of_same_single_byte_file() {
    let source = TempDir::new().unwrap();
    populate(source.path(), &[("x", b"x")]);
    let mut store = Store::open_in_memory().unwrap();

    take_snapshot(&mut store, source.path());
    take_snapshot(&mut store, source.path());

    let report = ops::list(&store).unwrap();
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].size, 1);
    assert_eq!(report.rows[0].distinct_size, 0);
    assert_eq!(report.rows[1].size, 1);
    assert_eq!(report.rows[1].distinct_size, 0);
    assert_eq!(report.total_size, 1);
}

#[test]
fn test_rows_ascend_by_id_and_carry_taken_at() {
    let source = TempDir::new().unwrap();
    populate(source.path(), &[("f", b"f")]);
    let mut store = Store::open_in_memory().unwrap();
    take_snapshot(&mut store, source.path());
    take_snapshot(&mut store, source.path());

    let report = ops::list(&store).unwrap();
    assert!(report.rows[0].id < report.rows[1].id);
    for row in &report.rows {
        // YYYY-MM-DD HH:MM:SS
        assert_eq!(row.taken_at.len(), 19);
    }
}

#[test]
fn test_size_double_counts_shared_content_within_snapshot() {
    let source = TempDir::new().unwrap();
    populate(source.path(), &[("a.txt", b"hello"), ("b.txt", b"hello")]);
    let mut store = Store::open_in_memory().unwrap();
    take_snapshot(&mut store, source.path());

    let report = ops::list(&store).unwrap();
    assert_eq!(report.rows[0].size, 10);
    assert_eq!(report.rows[0].distinct_size, 5);
    assert_eq!(report.total_size, 5);
}

#[test]
fn test_distinct_sizes_sum_to_total() {
    let source = TempDir::new().unwrap();
    populate(source.path(), &[("shared.txt", b"shared"), ("one.txt", b"one")]);
    let mut store = Store::open_in_memory().unwrap();
    take_snapshot(&mut store, source.path());

    std::fs::remove_file(source.path().join("one.txt")).unwrap();
    populate(source.path(), &[("two.txt", b"a different payload")]);
    take_snapshot(&mut store, source.path());

    let report = ops::list(&store).unwrap();
    let distinct_sum: u64 = report.rows.iter().map(|r| r.distinct_size).sum();
    assert_eq!(distinct_sum, report.total_size);

    let size_sum: u64 = report.rows.iter().map(|r| r.size).sum();
    assert!(size_sum > report.total_size, "shared bytes count per snapshot");
}
