//! Reconciliation engine behavior against an in-memory table.

mod common;

use std::sync::{Arc, Mutex};

use common::{date, listing, MemoryTable, Op};
use listing_sync::config::SyncConfig;
use listing_sync::error::SyncError;
use listing_sync::sync::{Reconciler, SyncContext, SyncObserver};

fn config(batch_size: usize) -> SyncConfig {
    SyncConfig {
        batch_size,
        ..Default::default()
    }
}

#[tokio::test]
async fn insert_path_writes_all_fields_and_run_date() {
    let today = date(2026, 8, 6);
    let mut table = MemoryTable::new(today);
    let incoming = vec![listing(999)];

    let report = Reconciler::new(&config(1000))
        .reconcile(&incoming, &mut table)
        .await
        .unwrap();

    assert_eq!(report.batches, 1);
    assert_eq!(report.inserted, 1);
    assert_eq!(report.updated, 0);
    assert_eq!(report.unchanged, 0);
    assert_eq!(table.ops[0], Op::EnsureTable);
    assert_eq!(table.writes(), 1);

    let stored = &table.rows[&999];
    assert_eq!(stored.listing, incoming[0]);
    assert_eq!(stored.last_updated_date, today);
}

#[tokio::test]
async fn update_only_on_change_touches_tracked_fields_and_advances_date() {
    let today = date(2026, 8, 6);
    let stamped = date(2026, 1, 1);
    let mut existing = listing(42);
    existing.name = "Original name".to_string();
    existing.price = 100;
    let mut table = MemoryTable::seeded(today, stamped, vec![existing]);

    let mut incoming = listing(42);
    incoming.name = "Renamed in snapshot".to_string();
    incoming.price = 150;

    let report = Reconciler::new(&config(1000))
        .reconcile(&[incoming], &mut table)
        .await
        .unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(report.inserted, 0);
    assert_eq!(table.writes(), 1);

    let stored = &table.rows[&42];
    assert_eq!(stored.listing.price, 150);
    // Untracked fields are never rewritten.
    assert_eq!(stored.listing.name, "Original name");
    assert_eq!(stored.last_updated_date, today);
}

#[tokio::test]
async fn no_op_path_leaves_the_row_untouched() {
    let today = date(2026, 8, 6);
    let stamped = date(2026, 1, 1);
    let mut table = MemoryTable::seeded(today, stamped, vec![listing(7)]);

    let report = Reconciler::new(&config(1000))
        .reconcile(&[listing(7)], &mut table)
        .await
        .unwrap();

    assert_eq!(report.unchanged, 1);
    assert_eq!(table.writes(), 0);
    assert_eq!(table.rows[&7].last_updated_date, stamped);
}

#[tokio::test]
async fn second_run_over_unchanged_data_is_idempotent() {
    let today = date(2026, 8, 6);
    let mut table = MemoryTable::new(today);
    let snapshot: Vec<_> = (1..=5).map(listing).collect();
    let engine = Reconciler::new(&config(1000));

    let first = engine.reconcile(&snapshot, &mut table).await.unwrap();
    assert_eq!(first.inserted, 5);

    let writes_after_first = table.writes();
    let second = engine.reconcile(&snapshot, &mut table).await.unwrap();
    assert_eq!(second.inserted, 0);
    assert_eq!(second.updated, 0);
    assert_eq!(second.unchanged, 5);
    assert_eq!(table.writes(), writes_after_first);
}

#[derive(Default)]
struct BatchRecorder {
    batches: Mutex<Vec<(usize, usize)>>,
}

impl SyncObserver for BatchRecorder {
    fn on_batch(&self, _ctx: &SyncContext, batch_index: usize, rows: usize) {
        self.batches.lock().unwrap().push((batch_index, rows));
    }
}

#[tokio::test]
async fn dataset_of_2500_makes_three_batches_visiting_every_record_once() {
    let today = date(2026, 8, 6);
    let mut table = MemoryTable::new(today);
    let snapshot: Vec<_> = (1..=2500).map(listing).collect();
    let recorder = Arc::new(BatchRecorder::default());

    let report = Reconciler::new(&config(1000))
        .with_observer(recorder.clone())
        .reconcile(&snapshot, &mut table)
        .await
        .unwrap();

    assert_eq!(report.batches, 3);
    assert_eq!(report.inserted, 2500);
    assert_eq!(
        recorder.batches.lock().unwrap().clone(),
        vec![(0, 1000), (1, 1000), (2, 500)]
    );

    let mut looked_up: Vec<i64> = table
        .ops
        .iter()
        .filter_map(|op| match op {
            Op::Lookup(id) => Some(*id),
            _ => None,
        })
        .collect();
    looked_up.sort_unstable();
    assert_eq!(looked_up, (1..=2500).collect::<Vec<i64>>());
}

#[tokio::test]
async fn exactly_one_commit_covers_the_whole_run() {
    let today = date(2026, 8, 6);
    let mut table = MemoryTable::new(today);
    let snapshot: Vec<_> = (1..=2500).map(listing).collect();

    Reconciler::new(&config(1000))
        .reconcile(&snapshot, &mut table)
        .await
        .unwrap();

    assert_eq!(table.commits, 1);
    assert_eq!(table.ops.last(), Some(&Op::Commit));
}

#[tokio::test]
async fn storage_fault_aborts_the_run_without_commit() {
    let today = date(2026, 8, 6);
    let mut table = MemoryTable::new(today);
    table.fail_inserts = true;

    let err = Reconciler::new(&config(1000))
        .reconcile(&[listing(1)], &mut table)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Storage(_)));
    assert_eq!(table.commits, 0);
}

#[test]
#[should_panic(expected = "batch_size must be > 0")]
fn zero_batch_size_panics_at_construction() {
    let _ = Reconciler::new(&config(0));
}
