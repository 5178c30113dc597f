//! Transaction values and their wire form.

use crate::engine::error::AdmissionError;
use serde::{Deserialize, Serialize};

/// A single monetary transaction.
///
/// Any sign or magnitude of `amount` is accepted as long as it is finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transaction {
    /// Transaction amount
    pub amount: f64,
    /// Epoch milliseconds, UTC (when the transaction happened, not when it was posted)
    pub timestamp: i64,
}

impl Transaction {
    /// Build a transaction, rejecting amounts that would poison the aggregate.
    pub fn new(amount: f64, timestamp: i64) -> Result<Self, AdmissionError> {
        if !amount.is_finite() {
            return Err(AdmissionError::InvalidInput(format!(
                "amount must be a finite number, got {amount}"
            )));
        }
        Ok(Self { amount, timestamp })
    }
}

/// Body of `POST /transactions`.
///
/// Both fields are optional here so that a missing field is reported as
/// invalid input instead of a deserialization failure. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub amount: Option<f64>,
    pub timestamp: Option<i64>,
}

impl TryFrom<TransactionRequest> for Transaction {
    type Error = AdmissionError;

    fn try_from(request: TransactionRequest) -> Result<Self, Self::Error> {
        let amount = request
            .amount
            .ok_or_else(|| AdmissionError::InvalidInput("missing field `amount`".to_string()))?;
        let timestamp = request.timestamp.ok_or_else(|| {
            AdmissionError::InvalidInput("missing field `timestamp`".to_string())
        })?;
        Transaction::new(amount, timestamp)
    }
}
