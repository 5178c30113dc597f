//! Core functionality for transaction statistics.
//!
//! This module contains:
//! - The window store holding in-window transactions
//! - Aggregate computation over the window contents
//! - The engine that ties admission, eviction and queries together

pub mod aggregate;
pub mod clock;
pub mod error;
pub mod statistics;
pub mod store;
pub mod transaction;

// Re-export commonly used types
pub use aggregate::Aggregate;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::AdmissionError;
pub use statistics::{RecomputeOutcome, SharedEngine, StatisticsEngine};
pub use store::{EntryId, WindowStore};
pub use transaction::{Transaction, TransactionRequest};
