//! Persistence round-trips through JSON snapshots.
//!
//! The store is memory-only; these tests verify that a snapshot written
//! to disk rehydrates an equivalent store in a fresh session.

use exo_triples::config::StoreConfig;
use exo_triples::error::SnapshotError;
use exo_triples::graph::term::XSD_DATE_TIME;
use exo_triples::graph::{Iri, Literal, Object, Subject, Triple, TripleStore};
use exo_triples::snapshot::Snapshot;

const UUID: &str = "123e4567-e89b-12d3-a456-426614174000";

fn seed(store: &TripleStore) {
    let note = format!("vault://tasks/task-{UUID}.md");
    store.add(Triple::new(note.as_str(), "ex:type", Object::iri("ex:Task")));
    store.add(Triple::new(
        note.as_str(),
        "ex:due",
        Literal::typed("2026-10-16T09:00:00Z", XSD_DATE_TIME),
    ));
    store.add(Triple::new(note.as_str(), "ex:label", Literal::lang("Réunion", "fr")));
    store.add(Triple::new(
        Subject::blank("b0"),
        Iri::new("ex:about"),
        Object::iri(note),
    ));
}

#[test]
fn store_survives_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("triples.json");

    // First session: build and save.
    {
        let store = TripleStore::new();
        seed(&store);
        Snapshot::capture(&store).save(&path).unwrap();
    }

    // Second session: reload and verify.
    {
        let store = TripleStore::new();
        let loaded = Snapshot::load(&path).unwrap().restore(&store);
        assert_eq!(loaded, 4);

        let original = TripleStore::new();
        seed(&original);
        for t in original.triples() {
            assert!(store.has(&t), "missing {t}");
        }

        // The UUID index is rebuilt on restore.
        assert_eq!(store.find_subjects_by_uuid(UUID).len(), 1);
    }
}

#[test]
fn restore_into_populated_store_skips_duplicates() {
    let store = TripleStore::new();
    seed(&store);
    let snapshot = Snapshot::capture(&store);
    assert_eq!(snapshot.restore(&store), 0);
    assert_eq!(store.count(), 4);
}

#[test]
fn restore_respects_config() {
    let store = TripleStore::new();
    seed(&store);
    let snapshot = Snapshot::capture(&store);

    let restored = TripleStore::with_config(StoreConfig {
        cache_capacity: 4,
        uuid_index: false,
    });
    snapshot.restore(&restored);
    assert_eq!(restored.stats().uuid_keys, 0);
    assert_eq!(restored.find_subjects_by_uuid(UUID).len(), 1);
}

#[test]
fn missing_snapshot_is_io_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = Snapshot::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, SnapshotError::Io { .. }));
}

#[test]
fn empty_snapshot_roundtrip() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("empty.json");
    Snapshot::empty().save(&path).unwrap();

    let store = TripleStore::new();
    assert_eq!(Snapshot::load(&path).unwrap().restore(&store), 0);
    assert!(store.is_empty());
}
