//! Secondary index from embedded UUIDs to subject IRIs.
//!
//! Subject IRIs derived from file names often carry a UUID
//! (`.../asset-550e8400-e29b-41d4-a716-446655440000.md`). The index maps each
//! lowercase UUID found in a subject IRI to the set of IRIs containing it.
//!
//! Entries are never removed when triples are removed. The store re-checks
//! every candidate against its SPO index at lookup time instead.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::term::Iri;

static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .expect("static UUID regex is valid")
});

/// All UUID-shaped substrings of `text`, lowercased.
pub fn extract_uuids(text: &str) -> impl Iterator<Item = String> + '_ {
    UUID_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_ascii_lowercase())
}

#[derive(Debug, Default)]
pub struct UuidIndex {
    map: HashMap<String, HashSet<Iri>>,
}

impl UuidIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every UUID embedded in `subject`.
    pub fn record(&mut self, subject: &Iri) {
        for uuid in extract_uuids(subject.as_str()) {
            self.map.entry(uuid).or_default().insert(subject.clone());
        }
    }

    /// Candidate subjects for `uuid` (any case). May include stale entries.
    pub fn candidates(&self, uuid: &str) -> impl Iterator<Item = &Iri> {
        self.map
            .get(&uuid.trim().to_ascii_lowercase())
            .into_iter()
            .flatten()
    }

    /// Number of distinct UUIDs indexed.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}
