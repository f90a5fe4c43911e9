//! Pure reduction helpers shared by the generators and the dashboard
//! renderers: grouped sums, guarded ratios and the fixed decimal rounding
//! used across all persisted tables.

use std::collections::HashMap;
use std::hash::Hash;

use crate::errors::DataError;

/// Running total and count for one group
#[derive(Debug, Default, Clone, Copy)]
pub struct Accumulator {
    pub total: f64,
    pub count: u32,
}

impl Accumulator {
    pub fn add(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
    }

    pub fn mean(&self) -> Result<f64, DataError> {
        if self.count == 0 {
            return Err(DataError::DivisionByZero("group mean".to_string()));
        }
        Ok(self.total / self.count as f64)
    }
}

/// Single-pass grouped sum over a row collection
pub fn sum_by<T, K, KF, VF>(rows: &[T], key_fn: KF, value_fn: VF) -> HashMap<K, f64>
where
    K: Eq + Hash,
    KF: Fn(&T) -> K,
    VF: Fn(&T) -> f64,
{
    let mut totals: HashMap<K, f64> = HashMap::new();
    for row in rows {
        *totals.entry(key_fn(row)).or_default() += value_fn(row);
    }
    totals
}

/// `part / whole`, failing when the denominator group is empty
pub fn ratio(part: f64, whole: f64, context: &str) -> Result<f64, DataError> {
    if whole == 0.0 {
        return Err(DataError::DivisionByZero(context.to_string()));
    }
    Ok(part / whole)
}

/// Percentage share of a grand total
pub fn share_pct(part: f64, whole: f64, context: &str) -> Result<f64, DataError> {
    ratio(part, whole, context).map(|r| r * 100.0)
}

/// Period-over-period growth in percent: `(current - prior) / prior * 100`
pub fn growth_pct(prior: f64, current: f64) -> Result<f64, DataError> {
    ratio(current - prior, prior, "growth rate").map(|r| r * 100.0)
}

/// Currency precision: two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage precision: one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
