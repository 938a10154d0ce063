// ── Wire DTO → domain conversions ──
//
// The only place that parses wire enum strings. Unrecognized values map
// to the `Unknown` variants instead of failing the whole payload.

use chrono::Utc;

use parkdeck_api::endpoints::{
    FeeConfigResponse, LotCapacityDto, LotStatsResponse, ParkingLotResponse,
    PlatformStatsResponse, PricingRuleDto, SubscriptionPackageResponse, UserResponse,
    UserSubscriptionResponse,
};

use crate::model::{
    DurationType, FeeConfig, LotCapacity, LotStatus, LotStats, ParkingLot, PlatformStats,
    PricingRule, RevenuePoint, SubscriptionPackage, SubscriptionStatus, User, UserSubscription,
    VehicleType,
};

fn vehicle_type(s: &str) -> VehicleType {
    s.parse().unwrap_or(VehicleType::Unknown)
}

fn duration_type(s: &str) -> DurationType {
    s.parse().unwrap_or(DurationType::Unknown)
}

fn lot_status(s: &str) -> LotStatus {
    s.parse().unwrap_or(LotStatus::Unknown)
}

fn subscription_status(s: &str) -> SubscriptionStatus {
    s.parse().unwrap_or(SubscriptionStatus::Unknown)
}

impl From<LotCapacityDto> for LotCapacity {
    fn from(dto: LotCapacityDto) -> Self {
        Self {
            vehicle_type: vehicle_type(&dto.vehicle_type),
            spaces: dto.spaces,
        }
    }
}

impl From<PricingRuleDto> for PricingRule {
    fn from(dto: PricingRuleDto) -> Self {
        Self {
            vehicle_type: vehicle_type(&dto.vehicle_type),
            initial_charge: dto.initial_charge,
            initial_minutes: dto.initial_minutes,
            step_rate: dto.step_rate,
            step_minutes: dto.step_minutes,
        }
    }
}

impl From<ParkingLotResponse> for ParkingLot {
    fn from(dto: ParkingLotResponse) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            address_line: dto.address_line,
            district: dto.district,
            city: dto.city,
            latitude: dto.latitude,
            longitude: dto.longitude,
            status: lot_status(&dto.status),
            partner_id: dto.partner_id,
            capacities: dto.capacities.into_iter().map(LotCapacity::from).collect(),
            pricing_rules: dto
                .pricing_rules
                .into_iter()
                .map(PricingRule::from)
                .collect(),
        }
    }
}

impl From<SubscriptionPackageResponse> for SubscriptionPackage {
    fn from(dto: SubscriptionPackageResponse) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            price: dto.price,
            vehicle_type: vehicle_type(&dto.vehicle_type),
            duration_type: duration_type(&dto.duration_type),
            lot_id: dto.parking_lot_id,
            is_active: dto.is_active,
        }
    }
}

impl From<UserSubscriptionResponse> for UserSubscription {
    fn from(dto: UserSubscriptionResponse) -> Self {
        Self {
            id: dto.id,
            user_id: dto.user_id,
            package_id: dto.subscription_package_id,
            lot_id: dto.parking_lot_id,
            vehicle_id: dto.vehicle_id,
            license_plate: dto.license_plate,
            status: subscription_status(&dto.status),
            valid_from: dto.valid_from,
            valid_until: dto.valid_until,
        }
    }
}

impl From<UserResponse> for User {
    fn from(dto: UserResponse) -> Self {
        Self {
            id: dto.id,
            full_name: dto.full_name,
            phone: dto.phone,
            email: dto.account.map(|a| a.email),
        }
    }
}

impl From<FeeConfigResponse> for FeeConfig {
    fn from(dto: FeeConfigResponse) -> Self {
        // The server flag wins; older builds omit it and the client
        // derives activity from the date range.
        let is_active = dto.is_active.unwrap_or_else(|| {
            FeeConfig::active_on(dto.valid_from, dto.valid_until, Utc::now().date_naive())
        });
        Self {
            id: dto.id,
            rate: dto.rate,
            valid_from: dto.valid_from,
            valid_until: dto.valid_until,
            is_active,
        }
    }
}

impl From<PlatformStatsResponse> for PlatformStats {
    fn from(dto: PlatformStatsResponse) -> Self {
        Self {
            total_parking_lots: dto.total_parking_lots,
            total_partners: dto.total_partners,
            active_subscriptions: dto.active_subscriptions,
            revenue_by_day: dto
                .revenue_by_day
                .into_iter()
                .map(|p| RevenuePoint {
                    date: p.date,
                    amount: p.amount,
                })
                .collect(),
            subscriptions_by_status: dto
                .subscriptions_by_status
                .into_iter()
                .map(|c| (subscription_status(&c.status), c.count))
                .collect(),
        }
    }
}

impl From<LotStatsResponse> for LotStats {
    fn from(dto: LotStatsResponse) -> Self {
        Self {
            lot_id: dto.parking_lot_id,
            occupancy_rate: dto.occupancy_rate,
            active_subscriptions: dto.active_subscriptions,
            revenue_by_day: dto
                .revenue_by_day
                .into_iter()
                .map(|p| RevenuePoint {
                    date: p.date,
                    amount: p.amount,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_wire_status_survives_conversion() {
        assert_eq!(lot_status("SOMETHING_NEW"), LotStatus::Unknown);
        assert_eq!(subscription_status("ACTIVE"), SubscriptionStatus::Active);
    }
}
