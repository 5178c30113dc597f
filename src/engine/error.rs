//! Error taxonomy for admission.

use std::any::Any;
use thiserror::Error;

/// Why a transaction was not admitted into the window.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdmissionError {
    #[error("invalid transaction: {0}")]
    InvalidInput(String),

    #[error("transaction timestamp {timestamp} is in the future (now = {now})")]
    FutureTimestamp { timestamp: i64, now: i64 },

    #[error("transaction timestamp {timestamp} is older than the window cutoff {cutoff}")]
    ExpiredTimestamp { timestamp: i64, cutoff: i64 },

    /// A panic was caught while admitting the transaction.
    #[error("transaction could not be recorded: {0}")]
    Internal(String),
}

impl AdmissionError {
    /// Short machine-readable reason, used as a structured log field.
    pub fn reason(&self) -> &'static str {
        match self {
            AdmissionError::InvalidInput(_) => "invalid_input",
            AdmissionError::FutureTimestamp { .. } => "future_timestamp",
            AdmissionError::ExpiredTimestamp { .. } => "expired_timestamp",
            AdmissionError::Internal(_) => "internal",
        }
    }
}

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
