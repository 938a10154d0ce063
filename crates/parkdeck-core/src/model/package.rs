// ── Subscription-package domain type ──

use serde::{Deserialize, Serialize};

use super::common::{DurationType, VehicleType};

/// A package a partner sells for one of their lots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionPackage {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub vehicle_type: VehicleType,
    pub duration_type: DurationType,
    /// The lot this package grants access to.
    pub lot_id: i64,
    pub is_active: bool,
}
