//! Notes store behavior and its read-only merge into the snapshot.

mod common;

use common::builders::JobRowBuilder;
use common::harness::TestHarness;

use shopdispatch::db::{note_repo, Database};

#[test]
fn append_list_delete_round() {
    let db = Database::open_in_memory().unwrap();

    let id = note_repo::append(&db, "J1", "need to check engineering", "Kyle").unwrap();
    note_repo::append(&db, "J1", "drawing updated", "Kyle").unwrap();

    let notes = note_repo::list_for(&db, "J1").unwrap();
    assert_eq!(notes.len(), 2);
    assert!(notes.iter().all(|n| n.job_id == "J1"));

    assert!(note_repo::delete(&db, &id).unwrap());
    assert_eq!(note_repo::list_for(&db, "J1").unwrap().len(), 1);
}

#[test]
fn note_counts_merge_into_snapshot_rows() {
    let mut harness = TestHarness::new();
    harness.write_primary(&[
        &JobRowBuilder::new("J1").build(),
        &JobRowBuilder::new("J2").build(),
    ]);
    let db = harness.with_notes_db();
    note_repo::append(&db, "J1", "fixture on order", "Amy").unwrap();
    note_repo::append(&db, "J1", "fixture received", "Amy").unwrap();

    let snapshot = harness.refresh();
    let count_of = |job: &str| {
        snapshot
            .rows
            .iter()
            .find(|r| r.record.job_id == job)
            .map(|r| r.note_count)
            .unwrap()
    };

    assert_eq!(count_of("J1"), 2);
    assert_eq!(count_of("J2"), 0);
}

#[test]
fn notes_outlive_load_cycles() {
    let mut harness = TestHarness::new();
    harness.write_primary(&[&JobRowBuilder::new("J1").build()]);
    let db = harness.with_notes_db();

    // Note for a job that no load will ever contain again.
    note_repo::append(&db, "RETIRED-99", "kept for audit", "Dan").unwrap();

    let snapshot = harness.refresh();
    assert!(snapshot
        .rows
        .iter()
        .all(|r| r.record.job_id != "RETIRED-99"));

    // The note is still there, independent of the record set.
    let notes = note_repo::list_for(&db, "RETIRED-99").unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].text, "kept for audit");
}

#[test]
fn file_backed_store_persists_across_handles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dispatch.db");

    {
        let db = Database::open(&path).unwrap();
        note_repo::append(&db, "J1", "persisted", "Kyle").unwrap();
    }

    let db = Database::open(&path).unwrap();
    let notes = note_repo::list_for(&db, "J1").unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].created_by, "Kyle");
}

#[test]
fn concurrent_appends_from_multiple_handles() {
    let db = Database::open_in_memory().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let db = db.clone();
            std::thread::spawn(move || {
                for i in 0..25 {
                    let text = format!("note {} from worker {}", i, worker);
                    note_repo::append(&db, "J1", &text, "Shift").unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(note_repo::count_for(&db, "J1").unwrap(), 100);
}
