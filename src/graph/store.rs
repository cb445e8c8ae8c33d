//! The indexed triple store.
//!
//! All state lives in one [`StoreInner`] behind a single mutex: the primary
//! map from joined triple key to triple, the six-way index, the UUID index
//! and the query cache. Operations run to completion under the lock, so no
//! caller ever observes a half-applied mutation.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;

use super::cache::{CachedMatch, QueryCache};
use super::index::SixWayIndex;
use super::key::{self, PatternKey, TripleKey};
use super::term::{Iri, Object, Subject};
use super::transaction::{Transaction, TransactionOutcome, TxOp};
use super::uuid_index::{UuidIndex, extract_uuids};
use super::{Triple, TriplePattern};

/// Point-in-time counters describing a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub triples: usize,
    pub subjects: usize,
    pub predicates: usize,
    pub objects: usize,
    /// Distinct UUIDs in the secondary index, stale ones included.
    pub uuid_keys: usize,
    pub cached_queries: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

struct StoreInner {
    /// Joined `s|p|o` key → the triple as it was added.
    triples: HashMap<String, Triple>,
    index: SixWayIndex,
    uuids: UuidIndex,
    cache: QueryCache,
    index_uuids: bool,
}

impl StoreInner {
    fn new(config: &StoreConfig) -> Self {
        Self {
            triples: HashMap::new(),
            index: SixWayIndex::new(),
            uuids: UuidIndex::new(),
            cache: QueryCache::new(config.cache_capacity),
            index_uuids: config.uuid_index,
        }
    }

    fn add(&mut self, triple: Triple) -> bool {
        let key = TripleKey::of(&triple);
        let joined = key.joined();
        if self.triples.contains_key(&joined) {
            return false;
        }
        self.index.insert(&key);
        if self.index_uuids {
            if let Subject::Iri(iri) = &triple.subject {
                self.uuids.record(iri);
            }
        }
        self.triples.insert(joined, triple);
        self.cache.invalidate();
        true
    }

    fn remove(&mut self, triple: &Triple) -> bool {
        let key = TripleKey::of(triple);
        if self.triples.remove(&key.joined()).is_none() {
            return false;
        }
        self.index.remove(&key);
        self.cache.invalidate();
        true
    }

    fn has(&self, triple: &Triple) -> bool {
        self.triples.contains_key(&TripleKey::of(triple).joined())
    }

    fn clear(&mut self) {
        self.triples.clear();
        self.index.clear();
        self.uuids.clear();
        self.cache.invalidate();
    }

    /// The stored triple for three component keys, if it still exists.
    fn fetch(&self, s: &str, p: &str, o: &str) -> Option<&Triple> {
        self.triples.get(&key::join(s, p, o))
    }

    fn push(&self, out: &mut Vec<Triple>, s: &str, p: &str, o: &str) {
        if let Some(triple) = self.fetch(s, p, o) {
            out.push(triple.clone());
        }
    }

    fn match_triples(
        &mut self,
        subject: Option<&Subject>,
        predicate: Option<&Iri>,
        object: Option<&Object>,
    ) -> CachedMatch {
        let s = subject.map(key::subject_key);
        let p = predicate.map(key::iri_key);
        let o = object.map(key::object_key);

        let pattern = PatternKey::new(s.as_deref(), p.as_deref(), o.as_deref());
        if let Some(hit) = self.cache.get(&pattern) {
            return hit;
        }

        let result: CachedMatch = self.collect(s.as_deref(), p.as_deref(), o.as_deref()).into();
        self.cache.insert(pattern, Arc::clone(&result));
        result
    }

    /// Resolve a match shape through the index that has the bound
    /// positions as its leading levels.
    fn collect(&self, s: Option<&str>, p: Option<&str>, o: Option<&str>) -> Vec<Triple> {
        let idx = &self.index;
        let mut out = Vec::new();
        match (s, p, o) {
            (None, None, None) => out.extend(self.triples.values().cloned()),
            (Some(s), Some(p), Some(o)) => {
                if idx.spo.contains(s, p, o) {
                    self.push(&mut out, s, p, o);
                }
            }
            (Some(s), Some(p), None) => {
                for o in idx.spo.leaves(s, p).into_iter().flatten() {
                    self.push(&mut out, s, p, o);
                }
            }
            (Some(s), None, Some(o)) => {
                for p in idx.sop.leaves(s, o).into_iter().flatten() {
                    self.push(&mut out, s, p, o);
                }
            }
            (None, Some(p), Some(o)) => {
                for s in idx.pos.leaves(p, o).into_iter().flatten() {
                    self.push(&mut out, s, p, o);
                }
            }
            (Some(s), None, None) => {
                for (p, objects) in idx.spo.level(s).into_iter().flatten() {
                    for o in objects {
                        self.push(&mut out, s, p, o);
                    }
                }
            }
            (None, Some(p), None) => {
                for (s, objects) in idx.pso.level(p).into_iter().flatten() {
                    for o in objects {
                        self.push(&mut out, s, p, o);
                    }
                }
            }
            (None, None, Some(o)) => {
                for (s, predicates) in idx.osp.level(o).into_iter().flatten() {
                    for p in predicates {
                        self.push(&mut out, s, p, o);
                    }
                }
            }
        }
        out
    }

    fn subjects(&self) -> Vec<Subject> {
        let spo = &self.index.spo;
        spo.firsts()
            .filter_map(|s| {
                let (p, objects) = spo.level(s)?.iter().next()?;
                let o = objects.iter().next()?;
                self.fetch(s, p, o).map(|t| t.subject.clone())
            })
            .collect()
    }

    fn predicates(&self) -> Vec<Iri> {
        let pso = &self.index.pso;
        pso.firsts()
            .filter_map(|p| {
                let (s, objects) = pso.level(p)?.iter().next()?;
                let o = objects.iter().next()?;
                self.fetch(s, p, o).map(|t| t.predicate.clone())
            })
            .collect()
    }

    fn objects(&self) -> Vec<Object> {
        let osp = &self.index.osp;
        osp.firsts()
            .filter_map(|o| {
                let (s, predicates) = osp.level(o)?.iter().next()?;
                let p = predicates.iter().next()?;
                self.fetch(s, p, o).map(|t| t.object.clone())
            })
            .collect()
    }

    fn find_subjects_by_uuid(&self, uuid: &str) -> Vec<Iri> {
        let mut found: Vec<Iri> = if self.index_uuids {
            self.uuids
                .candidates(uuid)
                .filter(|iri| self.index.spo.contains_first(&key::iri_key(iri)))
                .cloned()
                .collect()
        } else {
            self.scan_subjects_for_uuid(uuid)
        };
        found.sort();
        found
    }

    fn scan_subjects_for_uuid(&self, uuid: &str) -> Vec<Iri> {
        let wanted = uuid.trim().to_ascii_lowercase();
        let mut seen: HashSet<&Iri> = HashSet::new();
        for triple in self.triples.values() {
            if let Subject::Iri(iri) = &triple.subject {
                if !seen.contains(iri) && extract_uuids(iri.as_str()).any(|u| u == wanted) {
                    seen.insert(iri);
                }
            }
        }
        seen.into_iter().cloned().collect()
    }

    fn stats(&self) -> StoreStats {
        StoreStats {
            triples: self.triples.len(),
            subjects: self.index.spo.first_count(),
            predicates: self.index.pso.first_count(),
            objects: self.index.osp.first_count(),
            uuid_keys: self.uuids.len(),
            cached_queries: self.cache.len(),
            cache_hits: self.cache.hits(),
            cache_misses: self.cache.misses(),
        }
    }
}

/// In-memory triple store with six-way indexing, a query cache and a UUID
/// secondary index.
///
/// Starts empty and never touches disk. Safe to share across threads.
pub struct TripleStore {
    inner: Mutex<StoreInner>,
    config: StoreConfig,
}

impl TripleStore {
    /// Create an empty store with default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            inner: Mutex::new(StoreInner::new(&config)),
            config,
        }
    }

    /// Every mutation leaves the indices consistent before the guard drops,
    /// so a poisoned lock still guards valid state.
    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a triple. Returns `false` if an equal triple was already present.
    pub fn add(&self, triple: Triple) -> bool {
        self.lock().add(triple)
    }

    /// Remove a triple. Returns whether it was present.
    ///
    /// The UUID index keeps the subject; lookups filter it out instead.
    pub fn remove(&self, triple: &Triple) -> bool {
        self.lock().remove(triple)
    }

    pub fn has(&self, triple: &Triple) -> bool {
        self.lock().has(triple)
    }

    /// Add every triple, returning how many were new.
    ///
    /// Not atomic with respect to the caller's intent: use a
    /// [`Transaction`] to group writes into one replay.
    pub fn add_all(&self, triples: impl IntoIterator<Item = Triple>) -> usize {
        // The input may read this store while it is iterated.
        let triples: Vec<Triple> = triples.into_iter().collect();
        let mut inner = self.lock();
        let added = triples
            .into_iter()
            .map(|t| inner.add(t))
            .filter(|&added| added)
            .count();
        tracing::debug!(added, "bulk add");
        added
    }

    /// Remove every triple, returning how many were actually present.
    pub fn remove_all<'t>(&self, triples: impl IntoIterator<Item = &'t Triple>) -> usize {
        let triples: Vec<&Triple> = triples.into_iter().collect();
        let mut inner = self.lock();
        let removed = triples
            .into_iter()
            .map(|t| inner.remove(t))
            .filter(|&removed| removed)
            .count();
        tracing::debug!(removed, "bulk remove");
        removed
    }

    /// Drop every triple, index entry and cached result.
    pub fn clear(&self) {
        let mut inner = self.lock();
        let dropped = inner.triples.len();
        inner.clear();
        tracing::debug!(dropped, "store cleared");
    }

    pub fn count(&self) -> usize {
        self.lock().triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// All triples matching the bound positions. `None` is a wildcard.
    ///
    /// Results come from the query cache when the same shape was asked
    /// since the last mutation. Order is unspecified.
    pub fn match_triples(
        &self,
        subject: Option<&Subject>,
        predicate: Option<&Iri>,
        object: Option<&Object>,
    ) -> Vec<Triple> {
        self.lock()
            .match_triples(subject, predicate, object)
            .to_vec()
    }

    /// [`match_triples`](Self::match_triples) for a [`TriplePattern`].
    pub fn find(&self, pattern: &TriplePattern) -> Vec<Triple> {
        self.match_triples(
            pattern.subject.as_ref(),
            pattern.predicate.as_ref(),
            pattern.object.as_ref(),
        )
    }

    /// Every stored triple.
    pub fn triples(&self) -> Vec<Triple> {
        self.match_triples(None, None, None)
    }

    /// Distinct subjects across all triples.
    pub fn subjects(&self) -> Vec<Subject> {
        self.lock().subjects()
    }

    /// Distinct predicates across all triples.
    pub fn predicates(&self) -> Vec<Iri> {
        self.lock().predicates()
    }

    /// Distinct objects across all triples.
    pub fn objects(&self) -> Vec<Object> {
        self.lock().objects()
    }

    /// Subject IRIs embedding `uuid` (case-insensitive), sorted.
    ///
    /// Subjects that no longer head any triple are filtered out.
    pub fn find_subjects_by_uuid(&self, uuid: &str) -> Vec<Iri> {
        self.lock().find_subjects_by_uuid(uuid)
    }

    /// Start buffering writes. See [`Transaction`].
    pub fn begin_transaction(&self) -> Transaction<'_> {
        Transaction::new(self)
    }

    /// Apply transaction operations in order under one lock acquisition.
    pub(crate) fn replay(&self, ops: &[TxOp]) -> TransactionOutcome {
        let mut inner = self.lock();
        let mut outcome = TransactionOutcome::default();
        for op in ops {
            match op {
                TxOp::Add(triple) => {
                    if inner.add(triple.clone()) {
                        outcome.added += 1;
                    }
                }
                TxOp::Remove(triple) => {
                    if inner.remove(triple) {
                        outcome.removed += 1;
                    }
                }
            }
        }
        outcome
    }

    pub fn stats(&self) -> StoreStats {
        self.lock().stats()
    }
}

impl Default for TripleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TripleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripleStore")
            .field("triples", &self.count())
            .field("config", &self.config)
            .finish()
    }
}
