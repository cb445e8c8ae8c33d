//! Canonical keys for terms, triples and match patterns.
//!
//! Every term reduces to a single string key that is the sole source of
//! truth for equality inside the store:
//!
//! - IRIs key as `i:<value>`
//! - blank nodes key as `b:<id>`
//! - literals key as `l:<value>`, suffixed with `^^<datatype>` or
//!   `@<language>`; an `xsd:string` datatype is dropped first
//!
//! A triple key joins the three term keys as `s|p|o`. `\` and `|` are
//! escaped in every component, and `^` and `@` additionally in literal
//! values, so distinct terms never collide and joined keys stay unambiguous.

use std::fmt;
use std::sync::Arc;

use super::Triple;
use super::term::{BlankNode, Iri, Literal, LiteralTag, Object, Subject};

/// Canonical key of a single term. Shared between all six indices.
pub type TermKey = Arc<str>;

const SEPARATOR: char = '|';

/// Placeholder for an unbound position in a [`PatternKey`].
const WILDCARD: &str = "?";

fn push_escaped(out: &mut String, raw: &str, extra: &[char]) {
    for c in raw.chars() {
        if c == '\\' || c == SEPARATOR || extra.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}

pub fn iri_key(iri: &Iri) -> TermKey {
    let mut out = String::with_capacity(iri.as_str().len() + 2);
    out.push_str("i:");
    push_escaped(&mut out, iri.as_str(), &[]);
    out.into()
}

pub fn blank_key(node: &BlankNode) -> TermKey {
    let mut out = String::with_capacity(node.id().len() + 2);
    out.push_str("b:");
    push_escaped(&mut out, node.id(), &[]);
    out.into()
}

pub fn literal_key(lit: &Literal) -> TermKey {
    let mut out = String::with_capacity(lit.value().len() + 2);
    out.push_str("l:");
    push_escaped(&mut out, lit.value(), &['^', '@']);
    match lit.normalized_tag() {
        Some(LiteralTag::Datatype(dt)) => {
            out.push_str("^^");
            push_escaped(&mut out, dt.as_str(), &[]);
        }
        Some(LiteralTag::Language(lang)) => {
            out.push('@');
            push_escaped(&mut out, lang, &[]);
        }
        None => {}
    }
    out.into()
}

pub fn subject_key(subject: &Subject) -> TermKey {
    match subject {
        Subject::Iri(iri) => iri_key(iri),
        Subject::Blank(node) => blank_key(node),
    }
}

pub fn object_key(object: &Object) -> TermKey {
    match object {
        Object::Iri(iri) => iri_key(iri),
        Object::Blank(node) => blank_key(node),
        Object::Literal(lit) => literal_key(lit),
    }
}

/// The three canonical term keys of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TripleKey {
    pub subject: TermKey,
    pub predicate: TermKey,
    pub object: TermKey,
}

impl TripleKey {
    pub fn of(triple: &Triple) -> Self {
        Self {
            subject: subject_key(&triple.subject),
            predicate: iri_key(&triple.predicate),
            object: object_key(&triple.object),
        }
    }

    /// Joined `s|p|o` form, used as the primary-store key.
    pub fn joined(&self) -> String {
        join(&self.subject, &self.predicate, &self.object)
    }
}

/// Join three component keys into a triple key.
pub fn join(subject: &str, predicate: &str, object: &str) -> String {
    let mut out = String::with_capacity(subject.len() + predicate.len() + object.len() + 2);
    out.push_str(subject);
    out.push(SEPARATOR);
    out.push_str(predicate);
    out.push(SEPARATOR);
    out.push_str(object);
    out
}

/// Cache key for a match shape: bound positions carry their term key,
/// unbound positions render as `?`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatternKey(String);

impl PatternKey {
    pub fn new(subject: Option<&str>, predicate: Option<&str>, object: Option<&str>) -> Self {
        Self(join(
            subject.unwrap_or(WILDCARD),
            predicate.unwrap_or(WILDCARD),
            object.unwrap_or(WILDCARD),
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
