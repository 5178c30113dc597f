//! The window store: every transaction currently inside the window.
//!
//! Entries are keyed by an admission sequence number, so two transactions with
//! the same amount and timestamp are still two entries. All primitive
//! operations are individually safe under concurrent use without an outer lock.

use crate::engine::transaction::Transaction;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Handle to a single stored entry, returned on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(u64);

/// Unordered concurrent collection of in-window transactions.
#[derive(Debug, Default)]
pub struct WindowStore {
    entries: DashMap<u64, Transaction>,
    next_id: AtomicU64,
}

impl WindowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transaction to the store.
    pub fn insert(&self, tx: Transaction) -> EntryId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(id, tx);
        EntryId(id)
    }

    /// Withdraw a previously inserted entry.
    pub fn remove(&self, id: EntryId) -> Option<Transaction> {
        self.entries.remove(&id.0).map(|(_, tx)| tx)
    }

    /// Remove every entry older than `cutoff_ms`, returning how many were dropped.
    pub fn sweep_older_than(&self, cutoff_ms: i64) -> usize {
        let mut evicted = 0;
        self.entries.retain(|_, tx| {
            let keep = tx.timestamp >= cutoff_ms;
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }

    /// Copy out the amounts currently held.
    pub fn amounts(&self) -> Vec<f64> {
        self.entries.iter().map(|entry| entry.value().amount).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
