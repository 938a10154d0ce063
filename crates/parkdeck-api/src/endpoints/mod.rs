//! Endpoint groups, one module per backend resource.
//!
//! Each module adds inherent methods to [`ApiClient`](crate::ApiClient)
//! that map 1:1 to REST endpoints, plus the wire DTOs those endpoints
//! speak. No logic beyond URL/parameter construction lives here.

pub mod auth;
pub mod fees;
pub mod lots;
pub mod packages;
pub mod stats;
pub mod subscriptions;
pub mod users;

pub use auth::LoginResponse;
pub use fees::{FeeConfigCreate, FeeConfigResponse, FeeKind};
pub use lots::{
    LotCapacityDto, LotImportReport, ParkingLotCreate, ParkingLotResponse, PricingRuleDto,
};
pub use packages::{SubscriptionPackageCreate, SubscriptionPackageResponse};
pub use stats::{LotStatsResponse, PlatformStatsResponse, RevenuePointDto, StatusCountDto};
pub use subscriptions::UserSubscriptionResponse;
pub use users::{AccountDto, UserResponse};
