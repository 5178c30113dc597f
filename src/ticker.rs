//! Background eviction ticker.
//!
//! Periodically sweeps expired transactions and refreshes the published
//! aggregate, so an idle window still drains to empty.

use crate::config::{ConfigError, WindowConfig};
use crate::engine::error::panic_message;
use crate::engine::SharedEngine;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Spawn the ticker on the current tokio runtime.
///
/// The first tick fires after `tick_initial_delay`, then every `tick_interval`.
/// A tick that panics is logged and the ticker keeps going. Abort the returned
/// handle to stop it. A zero tick interval is rejected up front.
pub fn spawn_eviction_ticker(
    engine: SharedEngine,
    config: &WindowConfig,
) -> Result<JoinHandle<()>, ConfigError> {
    config.validate()?;
    let period = config.tick_interval();
    let start = Instant::now() + config.tick_initial_delay();

    Ok(tokio::spawn(async move {
        let mut ticker = interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            every_ms = period.as_millis() as u64,
            "eviction ticker started"
        );

        loop {
            ticker.tick().await;

            match catch_unwind(AssertUnwindSafe(|| engine.recompute())) {
                Ok(outcome) => {
                    tracing::trace!(
                        evicted = outcome.evicted,
                        count = outcome.count,
                        "eviction tick"
                    );
                }
                Err(payload) => {
                    tracing::error!("Eviction tick failed: {}", panic_message(payload.as_ref()));
                }
            }
        }
    }))
}
