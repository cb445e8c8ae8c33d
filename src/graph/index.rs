//! Six-way permutation index over canonical term keys.
//!
//! Each [`PermutationIndex`] is a three-level nested map
//! `first → second → {third}` for one ordering of (subject, predicate,
//! object). Keeping all six orderings lets every boundedness pattern be
//! answered by walking at most two map levels, never by scanning.

use std::collections::{HashMap, HashSet};

use super::key::{TermKey, TripleKey};

type Level = HashMap<TermKey, HashSet<TermKey>>;

/// One ordering of the triple components.
#[derive(Debug, Default)]
pub struct PermutationIndex {
    map: HashMap<TermKey, Level>,
}

impl PermutationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the entry was not present.
    pub fn insert(&mut self, first: &TermKey, second: &TermKey, third: &TermKey) -> bool {
        self.map
            .entry(first.clone())
            .or_default()
            .entry(second.clone())
            .or_default()
            .insert(third.clone())
    }

    /// Remove an entry, pruning levels that become empty.
    pub fn remove(&mut self, first: &str, second: &str, third: &str) -> bool {
        let Some(level) = self.map.get_mut(first) else {
            return false;
        };
        let Some(leaves) = level.get_mut(second) else {
            return false;
        };
        let removed = leaves.remove(third);
        if leaves.is_empty() {
            level.remove(second);
        }
        if level.is_empty() {
            self.map.remove(first);
        }
        removed
    }

    pub fn contains(&self, first: &str, second: &str, third: &str) -> bool {
        self.leaves(first, second)
            .is_some_and(|leaves| leaves.contains(third))
    }

    /// All `second → {third}` entries under `first`.
    pub fn level(&self, first: &str) -> Option<&Level> {
        self.map.get(first)
    }

    /// The `{third}` set under `first → second`.
    pub fn leaves(&self, first: &str, second: &str) -> Option<&HashSet<TermKey>> {
        self.map.get(first)?.get(second)
    }

    /// Distinct first-position keys.
    pub fn firsts(&self) -> impl Iterator<Item = &TermKey> {
        self.map.keys()
    }

    pub fn contains_first(&self, first: &str) -> bool {
        self.map.contains_key(first)
    }

    pub fn first_count(&self) -> usize {
        self.map.len()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

/// The six orderings, kept in lock-step.
#[derive(Debug, Default)]
pub struct SixWayIndex {
    pub spo: PermutationIndex,
    pub sop: PermutationIndex,
    pub pso: PermutationIndex,
    pub pos: PermutationIndex,
    pub osp: PermutationIndex,
    pub ops: PermutationIndex,
}

impl SixWayIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &TripleKey) {
        let TripleKey {
            subject: s,
            predicate: p,
            object: o,
        } = key;
        self.spo.insert(s, p, o);
        self.sop.insert(s, o, p);
        self.pso.insert(p, s, o);
        self.pos.insert(p, o, s);
        self.osp.insert(o, s, p);
        self.ops.insert(o, p, s);
    }

    pub fn remove(&mut self, key: &TripleKey) {
        let (s, p, o) = (&*key.subject, &*key.predicate, &*key.object);
        self.spo.remove(s, p, o);
        self.sop.remove(s, o, p);
        self.pso.remove(p, s, o);
        self.pos.remove(p, o, s);
        self.osp.remove(o, s, p);
        self.ops.remove(o, p, s);
    }

    pub fn clear(&mut self) {
        self.spo.clear();
        self.sop.clear();
        self.pso.clear();
        self.pos.clear();
        self.osp.clear();
        self.ops.clear();
    }
}
