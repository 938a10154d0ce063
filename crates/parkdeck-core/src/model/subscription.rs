// ── User-subscription domain types ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// Lifecycle status of a purchased subscription.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    PendingPayment,
    Active,
    Inactive,
    Expired,
    Cancelled,
    Unknown,
}

impl SubscriptionStatus {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// A purchased instance of a subscription package, scoped to one lot
/// and one vehicle. This is the join entity: querying it requires both
/// the lot id and the package id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSubscription {
    pub id: i64,
    pub user_id: Uuid,
    pub package_id: i64,
    pub lot_id: i64,
    pub vehicle_id: Option<i64>,
    pub license_plate: Option<String>,
    pub status: SubscriptionStatus,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}
