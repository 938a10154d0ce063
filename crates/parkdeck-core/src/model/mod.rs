//! Canonical domain types.
//!
//! Wire DTOs from `parkdeck-api` are converted into these via
//! [`convert`](crate::convert); everything above the API boundary
//! (store, portal, CLI, TUI) speaks only these types.

pub mod common;
pub mod fees;
pub mod lot;
pub mod package;
pub mod stats;
pub mod subscription;
pub mod user;

pub use common::{DurationType, VehicleType};
pub use fees::FeeConfig;
pub use lot::{LotCapacity, LotStatus, ParkingLot, PricingRule};
pub use package::SubscriptionPackage;
pub use stats::{LotStats, PlatformStats, RevenuePoint};
pub use subscription::{SubscriptionStatus, UserSubscription};
pub use user::User;
