//! Buffered, non-isolated transactions.
//!
//! A [`Transaction`] records adds and removes without touching the store.
//! `commit` replays the buffer in order; `rollback` discards it. Either one
//! closes the transaction, after which every call fails with
//! [`TransactionError::Closed`].
//!
//! There is no snapshot isolation: the store may change between
//! `begin_transaction` and `commit`, and the replay sees those changes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TransactionError;

use super::Triple;
use super::store::TripleStore;

/// Result type for transaction operations.
pub type TransactionResult<T> = std::result::Result<T, TransactionError>;

/// Lifecycle of a transaction: `Open → Committed` or `Open → RolledBack`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionState {
    Open,
    Committed,
    RolledBack,
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Committed => write!(f, "committed"),
            Self::RolledBack => write!(f, "rolled back"),
        }
    }
}

/// A buffered write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TxOp {
    Add(Triple),
    Remove(Triple),
}

/// What a commit actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionOutcome {
    /// Buffered adds that inserted a new triple.
    pub added: usize,
    /// Buffered removes that deleted an existing triple.
    pub removed: usize,
}

/// Groups a caller's sequential writes into a single replay.
#[derive(Debug)]
pub struct Transaction<'a> {
    store: &'a TripleStore,
    ops: Vec<TxOp>,
    state: TransactionState,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(store: &'a TripleStore) -> Self {
        Self {
            store,
            ops: Vec::new(),
            state: TransactionState::Open,
        }
    }

    fn ensure_open(&self) -> TransactionResult<()> {
        match self.state {
            TransactionState::Open => Ok(()),
            state => Err(TransactionError::Closed { state }),
        }
    }

    /// Buffer an add.
    pub fn add(&mut self, triple: Triple) -> TransactionResult<()> {
        self.ensure_open()?;
        self.ops.push(TxOp::Add(triple));
        Ok(())
    }

    /// Buffer a remove.
    pub fn remove(&mut self, triple: Triple) -> TransactionResult<()> {
        self.ensure_open()?;
        self.ops.push(TxOp::Remove(triple));
        Ok(())
    }

    /// Replay the buffered operations against the store, in order.
    pub fn commit(&mut self) -> TransactionResult<TransactionOutcome> {
        self.ensure_open()?;
        let ops = std::mem::take(&mut self.ops);
        let outcome = self.store.replay(&ops);
        self.state = TransactionState::Committed;
        tracing::debug!(
            ops = ops.len(),
            added = outcome.added,
            removed = outcome.removed,
            "transaction committed"
        );
        Ok(outcome)
    }

    /// Discard the buffered operations.
    pub fn rollback(&mut self) -> TransactionResult<()> {
        self.ensure_open()?;
        let discarded = self.ops.len();
        self.ops.clear();
        self.state = TransactionState::RolledBack;
        tracing::debug!(discarded, "transaction rolled back");
        Ok(())
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Number of buffered operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
