//! End-to-end tests for the triple store contract.
//!
//! These exercise the public API the way ingestion code and query
//! evaluators use it: bulk loading, pattern matching in every shape,
//! literal equivalence, UUID resolution and transactions.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use exo_triples::error::TransactionError;
use exo_triples::graph::term::{XSD_INTEGER, XSD_STRING};
use exo_triples::graph::{
    BlankNode, Iri, Literal, Object, Subject, Triple, TriplePattern, TripleStore,
};

fn corpus() -> Vec<Triple> {
    vec![
        Triple::new("ex:task-1", "ex:type", Object::iri("ex:Task")),
        Triple::new("ex:task-1", "ex:label", Literal::simple("Write report")),
        Triple::new("ex:task-1", "ex:priority", Literal::typed("2", XSD_INTEGER)),
        Triple::new("ex:task-2", "ex:type", Object::iri("ex:Task")),
        Triple::new("ex:task-2", "ex:label", Literal::lang("Rapport", "fr")),
        Triple::new("ex:task-2", "ex:parent", Object::iri("ex:project-1")),
        Triple::new("ex:project-1", "ex:type", Object::iri("ex:Project")),
        Triple::new(Subject::blank("n0"), Iri::new("ex:about"), Object::iri("ex:task-1")),
        Triple::new(
            Subject::blank("n0"),
            Iri::new("ex:note"),
            Object::Blank(BlankNode::new("n1")),
        ),
    ]
}

fn loaded() -> TripleStore {
    let store = TripleStore::new();
    store.add_all(corpus());
    store
}

fn as_set(triples: Vec<Triple>) -> HashSet<Triple> {
    triples.into_iter().collect()
}

#[test]
fn idempotent_add() {
    let store = loaded();
    let before = store.count();
    let t = Triple::new("ex:new", "ex:p", Object::iri("ex:o"));
    store.add(t.clone());
    store.add(t);
    assert_eq!(store.count(), before + 1);
}

#[test]
fn add_remove_inverse() {
    let store = loaded();
    let before = store.count();
    let t = Triple::new("ex:fresh", "ex:p", Literal::simple("x"));
    store.add(t.clone());
    assert!(store.remove(&t));
    assert_eq!(store.count(), before);
}

#[test]
fn pattern_completeness() {
    let store = loaded();
    for t in corpus() {
        let found = store.match_triples(Some(&t.subject), Some(&t.predicate), Some(&t.object));
        assert_eq!(found, vec![t]);
    }
    assert_eq!(as_set(store.match_triples(None, None, None)), as_set(corpus()));
}

#[test]
fn boundedness_consistency() {
    let store = loaded();
    for t in corpus() {
        let s = Some(&t.subject);
        let p = Some(&t.predicate);
        let o = Some(&t.object);
        let shapes = [
            (s, None, None),
            (None, p, None),
            (None, None, o),
            (s, p, None),
            (s, None, o),
            (None, p, o),
            (s, p, o),
        ];
        for (s, p, o) in shapes {
            let found = store.match_triples(s, p, o);
            assert!(found.contains(&t), "{t} missing for shape {s:?} {p:?} {o:?}");
            let pattern = TriplePattern {
                subject: s.cloned(),
                predicate: p.cloned(),
                object: o.cloned(),
            };
            assert!(found.iter().all(|f| pattern.matches(f)));
        }
    }
}

#[test]
fn literal_equivalence() {
    let store = TripleStore::new();
    store.add(Triple::new("ex:s", "ex:p", Literal::typed("v", XSD_STRING)));

    let plain = Triple::new("ex:s", "ex:p", Literal::simple("v"));
    assert!(store.has(&plain));
    assert_eq!(
        store
            .match_triples(None, None, Some(&plain.object))
            .len(),
        1
    );
    assert!(store.remove(&plain));
    assert!(store.is_empty());
}

#[test]
fn uuid_lookup_any_case() {
    let store = loaded();
    let subject = "vault://Notes/asset-550e8400-e29b-41d4-a716-446655440000.md";
    store.add(Triple::new(subject, "ex:type", Object::iri("ex:Asset")));

    for query in [
        "550E8400-E29B-41D4-A716-446655440000",
        "550e8400-e29b-41d4-a716-446655440000",
    ] {
        assert_eq!(store.find_subjects_by_uuid(query), vec![Iri::new(subject)]);
    }
    assert!(
        store
            .find_subjects_by_uuid("00000000-0000-0000-0000-000000000000")
            .is_empty()
    );
}

#[test]
fn transaction_commit() {
    let store = TripleStore::new();
    let t = Triple::new("ex:s", "ex:p", Object::iri("ex:o"));

    let mut tx = store.begin_transaction();
    tx.add(t.clone()).unwrap();
    tx.commit().unwrap();
    assert!(store.has(&t));

    assert!(matches!(tx.commit(), Err(TransactionError::Closed { .. })));
    assert!(tx.add(t.clone()).is_err());
    assert!(tx.remove(t).is_err());
}

#[test]
fn transaction_rollback() {
    let store = loaded();
    let before = store.count();
    let t = Triple::new("ex:s", "ex:p", Object::iri("ex:o"));

    let mut tx = store.begin_transaction();
    tx.add(t.clone()).unwrap();
    tx.rollback().unwrap();

    assert!(!store.has(&t));
    assert_eq!(store.count(), before);
}

#[test]
fn scenario_single_literal_triple() {
    let store = TripleStore::new();
    let t = Triple::new("ex:s", "ex:p", Literal::simple("v"));

    store.add(t.clone());
    assert_eq!(store.count(), 1);
    assert_eq!(
        store.match_triples(None, Some(&Iri::new("ex:p")), None),
        vec![t.clone()]
    );
    assert!(store.remove(&t));
    assert_eq!(store.count(), 0);
}

#[test]
fn scenario_shared_type() {
    let store = TripleStore::new();
    let tasks: Vec<_> = ["ex:t1", "ex:t2", "ex:t3"]
        .into_iter()
        .map(|s| Triple::new(s, "ex:type", Object::iri("ex:Task")))
        .collect();
    store.add_all(tasks.clone());
    store.add(Triple::new("ex:p1", "ex:type", Object::iri("ex:Project")));

    let found = store.match_triples(None, Some(&Iri::new("ex:type")), Some(&Object::iri("ex:Task")));
    assert_eq!(as_set(found), as_set(tasks));
}

#[test]
fn find_with_pattern_builder() {
    let store = loaded();
    let pattern = TriplePattern::any()
        .with_predicate("ex:type")
        .with_object(Object::iri("ex:Project"));
    let found = store.find(&pattern);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].subject, Subject::iri("ex:project-1"));
}

#[test]
fn distinct_positions_cover_corpus() {
    let store = loaded();
    let subjects: HashSet<_> = store.subjects().into_iter().collect();
    let expected: HashSet<_> = corpus().into_iter().map(|t| t.subject).collect();
    assert_eq!(subjects, expected);

    assert_eq!(store.predicates().len(), 6);
    let objects: HashSet<_> = store.objects().into_iter().collect();
    assert_eq!(objects.len(), corpus().len() - 1); // ex:Task appears twice
}

#[test]
fn queries_stay_fast_at_ten_thousand_triples() {
    let store = TripleStore::new();
    store.add_all((0..10_000).map(|i| {
        Triple::new(
            Subject::iri(format!("vault://note-{}", i / 10)),
            Iri::new(format!("ex:p{}", i % 100)),
            Literal::simple(format!("v{}", i % 250)),
        )
    }));
    assert_eq!(store.count(), 10_000);

    let start = Instant::now();
    let by_predicate = store.match_triples(None, Some(&Iri::new("ex:p7")), None);
    let by_subject = store.match_triples(Some(&Subject::iri("vault://note-42")), None, None);
    let by_object = store.match_triples(None, None, Some(&Object::literal("v7")));
    let elapsed = start.elapsed();

    assert_eq!(by_predicate.len(), 100);
    assert_eq!(by_subject.len(), 10);
    assert_eq!(by_object.len(), 40);
    assert!(elapsed < Duration::from_millis(100), "took {elapsed:?}");
}
