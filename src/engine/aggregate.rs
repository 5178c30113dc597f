//! Summary statistics over the window contents.

use serde::{Deserialize, Serialize};

/// Statistics of every transaction in the window at the last recompute.
///
/// Only ever built from a non-empty set of amounts, so every field is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    /// Total of all amounts
    pub sum: f64,
    /// `sum / count`
    pub avg: f64,
    /// Largest single amount
    pub max: f64,
    /// Smallest single amount
    pub min: f64,
    /// Number of transactions
    pub count: u64,
}

impl Aggregate {
    /// Summarise `amounts` in a single pass.
    ///
    /// Returns `None` for an empty input; the division is never attempted.
    /// A sum that overflows `f64` is published as `±inf`, like any other value.
    pub fn from_amounts<I>(amounts: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut iter = amounts.into_iter();
        let first = iter.next()?;

        let (count, sum, min, max) = iter.fold((1u64, first, first, first), |acc, amount| {
            (acc.0 + 1, acc.1 + amount, acc.2.min(amount), acc.3.max(amount))
        });

        Some(Self {
            sum,
            avg: sum / count as f64,
            max,
            min,
            count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_empty_has_no_aggregate() {
        assert_eq!(Aggregate::from_amounts(Vec::new()), None);
    }

    #[test]
    fn test_single_amount() {
        let agg = Aggregate::from_amounts([-4.5]).unwrap();
        assert_eq!(agg.count, 1);
        assert_eq!(agg.sum, -4.5);
        assert_eq!(agg.avg, -4.5);
        assert_eq!(agg.min, -4.5);
        assert_eq!(agg.max, -4.5);
    }

    #[test]
    fn test_reference_amounts() {
        let agg = Aggregate::from_amounts([12.0, 13.0, 22.50, 12.30]).unwrap();
        assert_eq!(agg.count, 4);
        assert!((agg.sum - 59.8).abs() < EPSILON);
        assert!((agg.avg - 14.95).abs() < EPSILON);
        assert_eq!(agg.min, 12.0);
        assert_eq!(agg.max, 22.5);
    }

    #[test]
    fn test_overflowing_sum_is_published() {
        let agg = Aggregate::from_amounts([f64::MAX, f64::MAX]).unwrap();
        assert_eq!(agg.count, 2);
        assert_eq!(agg.sum, f64::INFINITY);
        assert_eq!(agg.avg, f64::INFINITY);
        assert_eq!(agg.max, f64::MAX);
        assert_eq!(agg.min, f64::MAX);
    }

    #[test]
    fn test_json_shape() {
        let agg = Aggregate::from_amounts([1.0, 3.0]).unwrap();
        let json = serde_json::to_value(agg).unwrap();
        assert_eq!(json["sum"], 4.0);
        assert_eq!(json["avg"], 2.0);
        assert_eq!(json["max"], 3.0);
        assert_eq!(json["min"], 1.0);
        assert_eq!(json["count"], 2);
    }
}
