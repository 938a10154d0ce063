// Fee-config endpoints (parking-service).
//
// Operational and device fees share one record shape and one CRUD
// surface; only the path differs, so both are driven by `FeeKind`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::envelope::{Page, PageRequest};
use crate::error::Error;

/// Which fee ledger a call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeKind {
    /// Platform operational fee charged to partners.
    Operational,
    /// Per-device fee for installed barrier/camera hardware.
    Device,
}

impl FeeKind {
    fn path(self) -> &'static str {
        match self {
            Self::Operational => "api/v1/parking-service/operational-fee-configs",
            Self::Device => "api/v1/parking-service/device-fee-configs",
        }
    }
}

/// A versioned rate record. `is_active` may be absent -- older backend
/// builds leave it to the client to derive from the date range.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeConfigResponse {
    pub id: i64,
    pub rate: f64,
    pub valid_from: NaiveDate,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Body for fee-config create and update calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeConfigCreate {
    pub rate: f64,
    pub valid_from: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,
}

impl ApiClient {
    pub async fn list_fee_configs(
        &self,
        kind: FeeKind,
        page: PageRequest,
    ) -> Result<Page<FeeConfigResponse>, Error> {
        self.get_page(kind.path(), &page.to_query()).await
    }

    pub async fn create_fee_config(
        &self,
        kind: FeeKind,
        body: &FeeConfigCreate,
    ) -> Result<FeeConfigResponse, Error> {
        self.post(kind.path(), body).await
    }

    pub async fn update_fee_config(
        &self,
        kind: FeeKind,
        config_id: i64,
        body: &FeeConfigCreate,
    ) -> Result<FeeConfigResponse, Error> {
        self.put(&format!("{}/{config_id}", kind.path()), body).await
    }

    pub async fn delete_fee_config(&self, kind: FeeKind, config_id: i64) -> Result<(), Error> {
        self.delete(&format!("{}/{config_id}", kind.path())).await
    }
}
