// ── Fee-config domain type ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A versioned platform fee rate (operational or device).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeConfig {
    pub id: i64,
    pub rate: f64,
    pub valid_from: NaiveDate,
    pub valid_until: Option<NaiveDate>,
    pub is_active: bool,
}

impl FeeConfig {
    /// Whether a record's date range covers `today`.
    ///
    /// Used when the server omits the `isActive` flag; the server value
    /// wins when present.
    pub fn active_on(valid_from: NaiveDate, valid_until: Option<NaiveDate>, today: NaiveDate) -> bool {
        valid_from <= today && valid_until.is_none_or(|until| today < until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().expect("valid date")
    }

    #[test]
    fn open_ended_record_stays_active() {
        assert!(FeeConfig::active_on(d("2025-01-01"), None, d("2025-06-15")));
    }

    #[test]
    fn bounds_are_inclusive_start_exclusive_end() {
        let from = d("2025-01-01");
        let until = Some(d("2025-02-01"));
        assert!(FeeConfig::active_on(from, until, d("2025-01-01")));
        assert!(FeeConfig::active_on(from, until, d("2025-01-31")));
        assert!(!FeeConfig::active_on(from, until, d("2025-02-01")));
        assert!(!FeeConfig::active_on(from, until, d("2024-12-31")));
    }
}
