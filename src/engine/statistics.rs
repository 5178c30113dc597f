//! The sliding-window statistics engine.
//!
//! Admission inserts into the [`WindowStore`] and then rebuilds the aggregate
//! from scratch. Rebuilds are serialized by a single lock; the result is
//! published as a whole immutable [`Aggregate`] so that readers never observe
//! a half-written value and never need the lock.

use crate::config::WindowConfig;
use crate::engine::aggregate::Aggregate;
use crate::engine::clock::{Clock, SystemClock};
use crate::engine::error::{panic_message, AdmissionError};
use crate::engine::store::{EntryId, WindowStore};
use crate::engine::transaction::Transaction;
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// What a single recompute did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecomputeOutcome {
    /// Entries dropped by the expiry sweep
    pub evicted: usize,
    /// Entries remaining in the window
    pub count: u64,
}

/// Owns the window store and the published aggregate.
///
/// Construct one per process and share it via `Arc`.
pub struct StatisticsEngine {
    window_ms: i64,
    store: WindowStore,
    aggregate: ArcSwapOption<Aggregate>,
    recompute_lock: Mutex<()>,
    clock: Arc<dyn Clock>,
}

impl StatisticsEngine {
    /// Create an engine driven by the system wall clock.
    pub fn new(config: &WindowConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an engine driven by an arbitrary clock.
    pub fn with_clock(config: &WindowConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            window_ms: config.window_millis(),
            store: WindowStore::new(),
            aggregate: ArcSwapOption::empty(),
            recompute_lock: Mutex::new(()),
            clock,
        }
    }

    /// Record a transaction, reporting only whether it was accepted.
    ///
    /// Rejections are logged by [`admit`](Self::admit) and never propagate.
    pub fn record(&self, tx: Transaction) -> bool {
        self.admit(tx).is_ok()
    }

    /// Record a transaction, reporting why it was rejected.
    ///
    /// Admission rules, in order:
    /// 1. `timestamp > now` is rejected as future-dated
    /// 2. `timestamp >= now - window` is stored and the aggregate rebuilt
    /// 3. anything older is rejected as expired
    ///
    /// A panic during admission is caught and reported as
    /// [`AdmissionError::Internal`].
    pub fn admit(&self, tx: Transaction) -> Result<(), AdmissionError> {
        let mut inserted = None;
        let result = catch_unwind(AssertUnwindSafe(|| self.try_admit(tx, &mut inserted)));

        result.unwrap_or_else(|payload| {
            // A recompute on another thread may already have counted the entry;
            // the next recompute drops it again.
            if let Some(id) = inserted {
                self.store.remove(id);
            }
            let err = AdmissionError::Internal(panic_message(payload.as_ref()));
            tracing::error!(
                reason = err.reason(),
                amount = tx.amount,
                timestamp = tx.timestamp,
                "An error occurred trying to add transaction: {}",
                err
            );
            Err(err)
        })
    }

    fn try_admit(
        &self,
        tx: Transaction,
        inserted: &mut Option<EntryId>,
    ) -> Result<(), AdmissionError> {
        let now = self.clock.now_millis();

        if tx.timestamp > now {
            let err = AdmissionError::FutureTimestamp {
                timestamp: tx.timestamp,
                now,
            };
            tracing::error!(reason = err.reason(), "Transaction ignored: {}", err);
            return Err(err);
        }

        let cutoff = now - self.window_ms;
        if tx.timestamp < cutoff {
            let err = AdmissionError::ExpiredTimestamp {
                timestamp: tx.timestamp,
                cutoff,
            };
            tracing::warn!(reason = err.reason(), "Cannot record transaction: {}", err);
            return Err(err);
        }

        *inserted = Some(self.store.insert(tx));
        self.recompute();
        Ok(())
    }

    /// Current statistics, or `None` if the window is empty.
    ///
    /// Takes no lock and never rescans the store. The result may include
    /// entries that expired since the last recompute; that lag is bounded by
    /// the ticker interval.
    pub fn query(&self) -> Option<Aggregate> {
        if self.store.is_empty() {
            return None;
        }
        self.aggregate.load_full().map(|agg| *agg)
    }

    /// Sweep expired entries and rebuild the aggregate.
    ///
    /// A sum beyond the `f64` range is published as `±inf`.
    pub fn recompute(&self) -> RecomputeOutcome {
        let _guard = self.recompute_lock.lock();

        let cutoff = self.clock.now_millis() - self.window_ms;
        let evicted = self.store.sweep_older_than(cutoff);

        let aggregate = Aggregate::from_amounts(self.store.amounts());
        let count = aggregate.map_or(0, |agg| agg.count);

        if evicted > 0 && count == 0 {
            tracing::info!(evicted, "All transactions expired");
        } else {
            tracing::debug!(evicted, count, "Window statistics recomputed");
        }

        self.aggregate.store(aggregate.map(Arc::new));

        RecomputeOutcome { evicted, count }
    }

    /// Number of entries currently held, including any not yet swept.
    pub fn window_len(&self) -> usize {
        self.store.len()
    }

    /// Window length in milliseconds.
    pub fn window_millis(&self) -> i64 {
        self.window_ms
    }
}

impl std::fmt::Debug for StatisticsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticsEngine")
            .field("window_ms", &self.window_ms)
            .field("window_len", &self.store.len())
            .field("aggregate", &self.aggregate.load_full())
            .finish()
    }
}

/// Thread-safe shared engine handle.
pub type SharedEngine = Arc<StatisticsEngine>;
