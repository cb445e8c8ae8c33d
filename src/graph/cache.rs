//! Bounded LRU cache of match results.
//!
//! Query evaluators issue the same match shape many times in a row, so
//! results are cached per [`PatternKey`]. Any successful mutation of the
//! store clears the whole cache.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use super::Triple;
use super::key::PatternKey;

/// Shared, immutable result of one match call.
pub type CachedMatch = Arc<[Triple]>;

/// LRU over match results. A capacity of zero disables caching.
#[derive(Debug)]
pub struct QueryCache {
    inner: Option<LruCache<PatternKey, CachedMatch>>,
    hits: u64,
    misses: u64,
}

impl QueryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: NonZeroUsize::new(capacity).map(LruCache::new),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a result, promoting it to most-recently-used.
    pub fn get(&mut self, key: &PatternKey) -> Option<CachedMatch> {
        let found = self.inner.as_mut()?.get(key).cloned();
        match found {
            Some(_) => {
                self.hits += 1;
                tracing::trace!(pattern = %key, "query cache hit");
            }
            None => self.misses += 1,
        }
        found
    }

    pub fn insert(&mut self, key: PatternKey, result: CachedMatch) {
        if let Some(cache) = self.inner.as_mut() {
            cache.put(key, result);
        }
    }

    /// Drop every cached result.
    pub fn invalidate(&mut self) {
        if let Some(cache) = self.inner.as_mut() {
            if !cache.is_empty() {
                tracing::trace!(entries = cache.len(), "query cache invalidated");
                cache.clear();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |c| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner.as_ref().map_or(0, |c| c.cap().get())
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::term::{Iri, Object, Subject};

    fn key(p: &str) -> PatternKey {
        PatternKey::new(None, Some(p), None)
    }

    fn result() -> CachedMatch {
        Arc::from(vec![Triple::new(
            Subject::iri("ex:s"),
            Iri::new("ex:p"),
            Object::iri("ex:o"),
        )])
    }

    #[test]
    fn insert_and_get() {
        let mut cache = QueryCache::new(4);
        assert!(cache.get(&key("a")).is_none());
        cache.insert(key("a"), result());
        assert_eq!(cache.get(&key("a")).map(|r| r.len()), Some(1));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = QueryCache::new(2);
        cache.insert(key("a"), result());
        cache.insert(key("b"), result());
        // Touch "a" so "b" becomes the eviction candidate.
        assert!(cache.get(&key("a")).is_some());
        cache.insert(key("c"), result());

        assert!(cache.get(&key("a")).is_some());
        assert!(cache.get(&key("b")).is_none());
        assert!(cache.get(&key("c")).is_some());
    }

    #[test]
    fn invalidate_clears_everything() {
        let mut cache = QueryCache::new(8);
        cache.insert(key("a"), result());
        cache.insert(key("b"), result());
        cache.invalidate();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 8);
    }

    #[test]
    fn zero_capacity_disables_caching() {
        let mut cache = QueryCache::new(0);
        cache.insert(key("a"), result());
        assert!(cache.get(&key("a")).is_none());
        assert_eq!(cache.capacity(), 0);
        assert_eq!(cache.misses(), 0);
    }
}
