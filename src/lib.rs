//! Transaction Statistics - sliding-window aggregates over a transaction stream.
//!
//! This library answers "what are the count, sum, average, min and max of all
//! transactions in the last 60 seconds?" without touching the transaction
//! history on the read path.
//!
//! # Guarantees
//!
//! - **Bounded window**: only transactions no older than the window are stored
//! - **No future entries**: transactions dated after "now" are never admitted
//! - **Consistent reads**: statistics are published as a whole, never torn
//! - **Idle drain**: a background ticker evicts expired entries with no traffic
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Transaction Statistics                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │   record    │──▶│   Window    │──▶│  Aggregate  │       │
//! │  │ (admission) │   │    Store    │   │  (publish)  │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │                           ▲                 │              │
//! │                           │                 ▼              │
//! │  ┌─────────────┐          │          ┌─────────────┐       │
//! │  │  Eviction   │──────────┘          │    query    │       │
//! │  │   Ticker    │                     │   (O(1))    │       │
//! │  └─────────────┘                     └─────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use transaction_statistics::{StatisticsEngine, Transaction, WindowConfig};
//!
//! let engine = StatisticsEngine::new(&WindowConfig::default());
//! let now = chrono::Utc::now().timestamp_millis();
//!
//! assert!(engine.record(Transaction::new(12.5, now).unwrap()));
//! assert_eq!(engine.query().map(|stats| stats.count), Some(1));
//! ```

pub mod config;
pub mod engine;
pub mod logging;
pub mod ticker;

#[cfg(feature = "server")]
pub mod server;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError, ServerSettings, WindowConfig};
pub use engine::{
    AdmissionError, Aggregate, Clock, ManualClock, RecomputeOutcome, SharedEngine, StatisticsEngine,
    SystemClock, Transaction, TransactionRequest,
};
pub use ticker::spawn_eviction_ticker;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
