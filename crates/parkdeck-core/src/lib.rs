//! Aggregation and domain layer between `parkdeck-api` and UI
//! consumers (CLI / TUI).
//!
//! This crate owns the business logic, domain model, and reactive data
//! infrastructure for the parkdeck workspace:
//!
//! - **[`Portal`]** — Central facade managing the session lifecycle
//!   (login, token refresh, logout), gated view refreshes, mutations,
//!   and the composite subscriber roster.
//!
//! - **[`DataStore`]** — Reactive storage (`DashMap` + `tokio::sync::watch`
//!   channels) holding the session's fetched entities. Local state is a
//!   cache of the backend, never authority.
//!
//! - **[`LookupMap`]** — The id → entity resolver behind display-time
//!   joins: deduplicated, concurrent, merge-only, failure-tolerant.
//!
//! - **[`roster`]** — The cross-product fetcher for the
//!   one-(lot,package)-per-call subscription endpoint, plus row
//!   assembly for the partner-subscribers view.
//!
//! - **[`listing`]** — Pure client-side filter / search / sort /
//!   paginate over fully fetched datasets.
//!
//! - **[`form`]** — The form/submission state machine: client-side
//!   validation gates every submit before the network is touched.
//!
//! - **Domain model** ([`model`]) — Canonical types (`ParkingLot`,
//!   `SubscriptionPackage`, `UserSubscription`, `User`, `FeeConfig`,
//!   statistics) converted from wire DTOs at a single boundary.

pub mod config;
pub mod convert;
pub mod error;
pub mod form;
pub mod listing;
pub mod lookup;
pub mod model;
pub mod portal;
pub mod roster;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{PortalConfig, TlsVerification};
pub use error::CoreError;
pub use listing::{ListPage, ListQuery};
pub use lookup::LookupMap;
pub use portal::{ActiveSession, Portal};
pub use roster::SubscriberRow;
pub use store::DataStore;
pub use stream::EntityStream;

// Wire-level types consumers need without depending on parkdeck-api
// directly.
pub use parkdeck_api::endpoints::{
    FeeConfigCreate, FeeKind, ParkingLotCreate, SubscriptionPackageCreate,
};
pub use parkdeck_api::{PageRequest, Role, SessionTokens, SortDir, TokenSource};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    DurationType,
    FeeConfig,
    LotCapacity,
    LotStats,
    LotStatus,
    ParkingLot,
    PlatformStats,
    PricingRule,
    RevenuePoint,
    SubscriptionPackage,
    SubscriptionStatus,
    User,
    UserSubscription,
    VehicleType,
};
