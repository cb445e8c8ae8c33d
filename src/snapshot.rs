//! JSON snapshots of a store's contents.
//!
//! The store itself never touches disk. A [`Snapshot`] captures every
//! triple through `match_triples` and rehydrates a store through `add_all`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::graph::{Triple, TripleStore};

/// Result type for snapshot operations.
pub type SnapshotResult<T> = std::result::Result<T, SnapshotError>;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable copy of a store's triples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub triples: Vec<Triple>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            triples: Vec::new(),
        }
    }

    /// Collect all triples, sorted by their N-Triples rendering so the
    /// output is stable across runs.
    pub fn capture(store: &TripleStore) -> Self {
        let mut triples = store.triples();
        triples.sort_by_cached_key(ToString::to_string);
        Self {
            version: SNAPSHOT_VERSION,
            triples,
        }
    }

    /// Add every triple to `store`, returning how many were new.
    pub fn restore(&self, store: &TripleStore) -> usize {
        store.add_all(self.triples.iter().cloned())
    }

    pub fn to_json(&self) -> SnapshotResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::Serialization {
            message: e.to_string(),
        })
    }

    pub fn from_json(json: &str) -> SnapshotResult<Self> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| SnapshotError::Serialization {
                message: e.to_string(),
            })?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }

    pub fn load(path: &Path) -> SnapshotResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| SnapshotError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: &Path) -> SnapshotResult<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| SnapshotError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}
