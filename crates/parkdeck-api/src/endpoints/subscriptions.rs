// User-subscription endpoints (user-service).
//
// The list endpoint mandates BOTH a parking-lot id and a subscription-
// package id per call -- it cannot return more than one (lot, package)
// combination at a time. The cross-product workaround for composite
// views lives in parkdeck-core, not here.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::envelope::{Page, PageRequest};
use crate::error::Error;

const USER_SUBS: &str = "v1/user-service/user-subscriptions";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSubscriptionResponse {
    pub id: i64,
    pub user_id: Uuid,
    pub subscription_package_id: i64,
    pub parking_lot_id: i64,
    #[serde(default)]
    pub vehicle_id: Option<i64>,
    #[serde(default)]
    pub license_plate: Option<String>,
    pub status: String,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
}

impl ApiClient {
    /// List user subscriptions for exactly one (lot, package) pair.
    ///
    /// Both ids are mandatory query parameters on the backend.
    pub async fn list_user_subscriptions(
        &self,
        parking_lot_id: i64,
        package_id: i64,
        page: PageRequest,
    ) -> Result<Page<UserSubscriptionResponse>, Error> {
        let mut params = page.to_query();
        params.push(("parkingLotId", parking_lot_id.to_string()));
        params.push(("subscriptionPackageId", package_id.to_string()));
        self.get_page(USER_SUBS, &params).await
    }

    pub async fn get_user_subscription(
        &self,
        subscription_id: i64,
    ) -> Result<UserSubscriptionResponse, Error> {
        self.get(&format!("{USER_SUBS}/{subscription_id}")).await
    }
}
