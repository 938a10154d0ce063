// Parking-lot endpoints (parking-service).
//
// CRUD, partner-scoped listing, status transitions, and opaque
// spreadsheet export/import. Blob contents are not interpreted here.

use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::envelope::{Page, PageRequest};
use crate::error::Error;

const LOTS: &str = "api/v1/parking-service/parking-lots";

/// Per-vehicle-type space count configured on a lot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotCapacityDto {
    pub vehicle_type: String,
    pub spaces: u32,
}

/// Step-rate billing formula attached to a lot and vehicle type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRuleDto {
    pub vehicle_type: String,
    /// Charge for the first `initial_minutes`.
    pub initial_charge: f64,
    pub initial_minutes: u32,
    /// Increment charged per additional `step_minutes`.
    pub step_rate: f64,
    pub step_minutes: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingLotResponse {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address_line: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub status: String,
    #[serde(default)]
    pub partner_id: Option<i64>,
    #[serde(default)]
    pub capacities: Vec<LotCapacityDto>,
    #[serde(default)]
    pub pricing_rules: Vec<PricingRuleDto>,
}

/// Body for lot create and update calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingLotCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub capacities: Vec<LotCapacityDto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pricing_rules: Vec<PricingRuleDto>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusUpdate<'a> {
    status: &'a str,
}

/// Outcome of a spreadsheet import.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotImportReport {
    #[serde(default)]
    pub imported: u32,
    #[serde(default)]
    pub failed: u32,
}

impl ApiClient {
    /// List all parking lots (admin view).
    pub async fn list_lots(&self, page: PageRequest) -> Result<Page<ParkingLotResponse>, Error> {
        self.get_page(LOTS, &page.to_query()).await
    }

    /// List the lots owned by a partner.
    pub async fn list_lots_by_partner(
        &self,
        partner_id: i64,
        page: PageRequest,
    ) -> Result<Page<ParkingLotResponse>, Error> {
        self.get_page(
            &format!("{LOTS}/by-partner/{partner_id}"),
            &page.to_query(),
        )
        .await
    }

    pub async fn get_lot(&self, lot_id: i64) -> Result<ParkingLotResponse, Error> {
        self.get(&format!("{LOTS}/{lot_id}")).await
    }

    pub async fn create_lot(&self, body: &ParkingLotCreate) -> Result<ParkingLotResponse, Error> {
        self.post(LOTS, body).await
    }

    pub async fn update_lot(
        &self,
        lot_id: i64,
        body: &ParkingLotCreate,
    ) -> Result<ParkingLotResponse, Error> {
        self.put(&format!("{LOTS}/{lot_id}"), body).await
    }

    pub async fn delete_lot(&self, lot_id: i64) -> Result<(), Error> {
        self.delete(&format!("{LOTS}/{lot_id}")).await
    }

    /// Transition a lot's lifecycle status (admin operation).
    pub async fn set_lot_status(
        &self,
        lot_id: i64,
        status: &str,
    ) -> Result<ParkingLotResponse, Error> {
        self.patch(&format!("{LOTS}/{lot_id}/status"), &StatusUpdate { status })
            .await
    }

    /// Download the lot catalog as an opaque `.xlsx` blob.
    pub async fn export_lots(&self) -> Result<Vec<u8>, Error> {
        self.get_bytes(&format!("{LOTS}/export")).await
    }

    /// Upload an opaque `.xlsx` blob of lots.
    pub async fn import_lots(&self, payload: Vec<u8>) -> Result<LotImportReport, Error> {
        self.post_bytes(&format!("{LOTS}/import"), payload).await
    }
}
