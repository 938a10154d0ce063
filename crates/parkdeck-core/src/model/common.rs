// ── Shared closed enums ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Vehicle category a capacity, pricing rule, or package applies to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    Car,
    Motorbike,
    Bicycle,
    Truck,
    /// Unrecognized wire value -- kept rather than dropped so rows
    /// still render.
    Unknown,
}

/// Billing period of a subscription package.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DurationType {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    Unknown,
}
