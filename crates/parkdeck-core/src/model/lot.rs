// ── Parking-lot domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::common::VehicleType;

/// Lifecycle status of a parking lot on the platform.
///
/// Lots move Pending → Preparing → PartnerConfiguration → Active in the
/// happy path; the remaining states are terminal or administrative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LotStatus {
    Pending,
    Preparing,
    PartnerConfiguration,
    Active,
    Inactive,
    MapDenied,
    Rejected,
    PendingPayment,
    Unknown,
}

impl LotStatus {
    /// Whether the lot is currently selling subscriptions.
    pub fn is_operational(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Per-vehicle-type space count configured on a lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotCapacity {
    pub vehicle_type: VehicleType,
    pub spaces: u32,
}

/// Step-rate billing formula for drive-up parking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRule {
    pub vehicle_type: VehicleType,
    pub initial_charge: f64,
    pub initial_minutes: u32,
    pub step_rate: f64,
    pub step_minutes: u32,
}

impl PricingRule {
    /// Charge for a stay of `minutes`: the initial charge covers the
    /// first `initial_minutes`, then `step_rate` accrues per started
    /// `step_minutes` block.
    pub fn charge_for(&self, minutes: u32) -> f64 {
        if minutes <= self.initial_minutes || self.step_minutes == 0 {
            return self.initial_charge;
        }
        let extra = minutes - self.initial_minutes;
        let steps = extra.div_ceil(self.step_minutes);
        self.initial_charge + f64::from(steps) * self.step_rate
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingLot {
    pub id: i64,
    pub name: String,
    pub address_line: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: LotStatus,
    /// Owning partner, when the caller is allowed to see it.
    pub partner_id: Option<i64>,
    pub capacities: Vec<LotCapacity>,
    pub pricing_rules: Vec<PricingRule>,
}

impl ParkingLot {
    /// Total configured spaces across all vehicle types.
    pub fn total_spaces(&self) -> u32 {
        self.capacities.iter().map(|c| c.spaces).sum()
    }

    /// One-line address for table display.
    pub fn address(&self) -> String {
        [&self.address_line, &self.district, &self.city]
            .into_iter()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> PricingRule {
        PricingRule {
            vehicle_type: VehicleType::Car,
            initial_charge: 5.0,
            initial_minutes: 60,
            step_rate: 2.0,
            step_minutes: 30,
        }
    }

    #[test]
    fn initial_window_pays_base_charge() {
        assert!((rule().charge_for(45) - 5.0).abs() < f64::EPSILON);
        assert!((rule().charge_for(60) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn started_steps_are_charged_in_full() {
        // 61 minutes starts one 30-minute step.
        assert!((rule().charge_for(61) - 7.0).abs() < f64::EPSILON);
        // 120 minutes = base + 2 full steps.
        assert!((rule().charge_for(120) - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn status_round_trips_through_wire_format() {
        let parsed: LotStatus = "PARTNER_CONFIGURATION".parse().expect("known status");
        assert_eq!(parsed, LotStatus::PartnerConfiguration);
        assert_eq!(parsed.to_string(), "PARTNER_CONFIGURATION");
    }
}
