//! Indexed triple store.
//!
//! The store holds a set of (subject, predicate, object) facts and answers
//! pattern matches with any combination of bound positions through six
//! permutation indices.
//!
//! - **Terms** ([`term`]): IRIs, blank nodes and literals with RDF 1.1 equality
//! - **Canonical keys** ([`key`]): the string form every index and cache uses
//! - **Store** ([`TripleStore`]): primary map, six-way index, UUID index, LRU cache
//! - **Transactions** ([`Transaction`]): buffered adds and removes replayed on commit

pub mod cache;
pub mod index;
pub mod key;
pub mod store;
pub mod term;
pub mod transaction;
pub mod uuid_index;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use store::{StoreStats, TripleStore};
pub use term::{BlankNode, Iri, Literal, Object, Subject};
pub use transaction::{Transaction, TransactionOutcome, TransactionState};

/// A (subject, predicate, object) fact.
///
/// Equality follows the term rules, so a triple whose object is typed
/// `xsd:string` equals the same triple with an untyped object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Subject,
    pub predicate: Iri,
    pub object: Object,
}

impl Triple {
    pub fn new(
        subject: impl Into<Subject>,
        predicate: impl Into<Iri>,
        object: impl Into<Object>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// A match pattern: unset positions are wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: Option<Subject>,
    pub predicate: Option<Iri>,
    pub object: Option<Object>,
}

impl TriplePattern {
    /// The pattern that matches every triple.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, subject: impl Into<Subject>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_predicate(mut self, predicate: impl Into<Iri>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    pub fn with_object(mut self, object: impl Into<Object>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Whether `triple` satisfies every bound position.
    pub fn matches(&self, triple: &Triple) -> bool {
        self.subject.as_ref().is_none_or(|s| *s == triple.subject)
            && self.predicate.as_ref().is_none_or(|p| *p == triple.predicate)
            && self.object.as_ref().is_none_or(|o| *o == triple.object)
    }
}

impl From<&Triple> for TriplePattern {
    fn from(triple: &Triple) -> Self {
        Self {
            subject: Some(triple.subject.clone()),
            predicate: Some(triple.predicate.clone()),
            object: Some(triple.object.clone()),
        }
    }
}
