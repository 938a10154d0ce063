// ── Dashboard statistics types ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::subscription::SubscriptionStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Platform-wide aggregates (admin dashboard).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformStats {
    pub total_parking_lots: u64,
    pub total_partners: u64,
    pub active_subscriptions: u64,
    pub revenue_by_day: Vec<RevenuePoint>,
    pub subscriptions_by_status: Vec<(SubscriptionStatus, u64)>,
}

impl PlatformStats {
    pub fn total_revenue(&self) -> f64 {
        self.revenue_by_day.iter().map(|p| p.amount).sum()
    }
}

/// Per-lot aggregates (partner dashboard).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotStats {
    pub lot_id: i64,
    /// 0.0 ..= 1.0
    pub occupancy_rate: f64,
    pub active_subscriptions: u64,
    pub revenue_by_day: Vec<RevenuePoint>,
}
