// Statistics endpoints (parking-service).
//
// Date-ranged aggregate reads for the dashboards. Read-only.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::Error;

const STATS: &str = "api/v1/parking-service/statistics";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePointDto {
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCountDto {
    pub status: String,
    pub count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStatsResponse {
    #[serde(default)]
    pub total_parking_lots: u64,
    #[serde(default)]
    pub total_partners: u64,
    #[serde(default)]
    pub active_subscriptions: u64,
    #[serde(default)]
    pub revenue_by_day: Vec<RevenuePointDto>,
    #[serde(default)]
    pub subscriptions_by_status: Vec<StatusCountDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotStatsResponse {
    pub parking_lot_id: i64,
    #[serde(default)]
    pub occupancy_rate: f64,
    #[serde(default)]
    pub active_subscriptions: u64,
    #[serde(default)]
    pub revenue_by_day: Vec<RevenuePointDto>,
}

fn range_params(from: NaiveDate, to: NaiveDate) -> Vec<(&'static str, String)> {
    vec![("from", from.to_string()), ("to", to.to_string())]
}

impl ApiClient {
    /// Platform-wide aggregates for the admin dashboard.
    pub async fn get_platform_stats(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PlatformStatsResponse, Error> {
        self.get_with_params(&format!("{STATS}/platform"), &range_params(from, to))
            .await
    }

    /// Per-lot aggregates for the partner dashboard.
    pub async fn get_lot_stats(
        &self,
        lot_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<LotStatsResponse, Error> {
        self.get_with_params(
            &format!("{STATS}/parking-lots/{lot_id}"),
            &range_params(from, to),
        )
        .await
    }
}
