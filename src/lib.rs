// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # exo-triples
//!
//! An indexed, in-memory RDF-style triple store for a semantic layer over a
//! folder of notes.
//!
//! ## Architecture
//!
//! - **Terms** (`graph::term`): IRIs, blank nodes and literals with RDF 1.1 equality
//! - **Store** (`graph::store`): six permutation indices, LRU query cache, UUID index
//! - **Transactions** (`graph::transaction`): buffered writes replayed on commit
//! - **Snapshots** (`snapshot`): JSON capture and restore
//!
//! ## Library usage
//!
//! ```
//! use exo_triples::graph::{Iri, Literal, Object, Triple, TripleStore};
//!
//! let store = TripleStore::new();
//! store.add(Triple::new("ex:task-1", "ex:type", Object::iri("ex:Task")));
//! store.add(Triple::new("ex:task-1", "ex:label", Literal::simple("Write report")));
//!
//! let tasks = store.match_triples(None, Some(&Iri::new("ex:type")), Some(&Object::iri("ex:Task")));
//! assert_eq!(tasks.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod snapshot;
