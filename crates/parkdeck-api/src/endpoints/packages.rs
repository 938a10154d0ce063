// Subscription-package endpoints (parking-service).

use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::envelope::{Page, PageRequest};
use crate::error::Error;

const PACKAGES: &str = "api/v1/parking-service/subscriptions";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPackageResponse {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub vehicle_type: String,
    pub duration_type: String,
    pub parking_lot_id: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Body for package create and update calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPackageCreate {
    pub name: String,
    pub price: f64,
    pub vehicle_type: String,
    pub duration_type: String,
    pub parking_lot_id: i64,
    pub is_active: bool,
}

impl ApiClient {
    /// List subscription packages. `owned_by_me` restricts results to
    /// packages owned by the authenticated partner.
    pub async fn list_packages(
        &self,
        owned_by_me: bool,
        page: PageRequest,
    ) -> Result<Page<SubscriptionPackageResponse>, Error> {
        let mut params = page.to_query();
        if owned_by_me {
            params.push(("ownedByMe", "true".into()));
        }
        self.get_page(PACKAGES, &params).await
    }

    pub async fn get_package(
        &self,
        package_id: i64,
    ) -> Result<SubscriptionPackageResponse, Error> {
        self.get(&format!("{PACKAGES}/{package_id}")).await
    }

    pub async fn create_package(
        &self,
        body: &SubscriptionPackageCreate,
    ) -> Result<SubscriptionPackageResponse, Error> {
        self.post(PACKAGES, body).await
    }

    pub async fn update_package(
        &self,
        package_id: i64,
        body: &SubscriptionPackageCreate,
    ) -> Result<SubscriptionPackageResponse, Error> {
        self.put(&format!("{PACKAGES}/{package_id}"), body).await
    }

    pub async fn delete_package(&self, package_id: i64) -> Result<(), Error> {
        self.delete(&format!("{PACKAGES}/{package_id}")).await
    }
}
