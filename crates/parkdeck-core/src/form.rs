// ── Form / submission state machine ──
//
// Every create/edit surface (TUI modal, CLI create command) drives its
// submit through a FormSession: validation runs before any network
// call, a rejected submit keeps the draft and surfaces the message, and
// the submitting flag cannot outlive the attempt because both terminal
// transitions clear it.

use chrono::NaiveDate;

use parkdeck_api::endpoints::{FeeConfigCreate, ParkingLotCreate, SubscriptionPackageCreate};

use crate::model::{DurationType, VehicleType};

// ── Violations ───────────────────────────────────────────────────────

/// All client-side validation failures for one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(pub Vec<String>);

impl std::fmt::Display for Violations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

impl std::error::Error for Violations {}

impl From<Violations> for crate::CoreError {
    fn from(v: Violations) -> Self {
        Self::ValidationFailed {
            message: v.to_string(),
        }
    }
}

/// Collects rule failures across a draft's fields.
#[derive(Debug, Default)]
pub struct Checker {
    violations: Vec<String>,
}

impl Checker {
    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.violations.push(format!("{field} is required"));
        }
    }

    pub fn present<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.violations.push(format!("{field} is required"));
        }
        value
    }

    pub fn positive(&mut self, field: &str, value: f64) {
        if value <= 0.0 {
            self.violations.push(format!("{field} must be positive"));
        }
    }

    pub fn positive_int(&mut self, field: &str, value: u32) {
        if value == 0 {
            self.violations.push(format!("{field} must be positive"));
        }
    }

    /// `valid_from < valid_until` when both ends are set.
    pub fn date_order(&mut self, from: Option<NaiveDate>, until: Option<NaiveDate>) {
        if let (Some(from), Some(until)) = (from, until) {
            if from >= until {
                self.violations
                    .push("validFrom must be before validUntil".into());
            }
        }
    }

    pub fn finish(self) -> Result<(), Violations> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(Violations(self.violations))
        }
    }
}

// ── Draft trait ──────────────────────────────────────────────────────

/// A form draft that validates into a request body.
///
/// Validation *is* the conversion: a draft that fails produces no
/// request, so nothing invalid can reach the wire.
pub trait FormModel {
    type Output;

    fn validate(&self) -> Result<Self::Output, Violations>;
}

// ── Session state machine ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
    View,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Closed,
    Open { error: Option<String> },
    Submitting,
}

/// Owns one form's lifecycle: `closed → open → submitting → closed`
/// on success, or back to `open` (draft retained, message shown) on
/// validation or server failure.
#[derive(Debug)]
pub struct FormSession<D: FormModel> {
    mode: FormMode,
    draft: D,
    state: State,
}

impl<D: FormModel + Default> FormSession<D> {
    /// A closed session with an empty draft.
    pub fn closed() -> Self {
        Self {
            mode: FormMode::Create,
            draft: D::default(),
            state: State::Closed,
        }
    }
}

impl<D: FormModel> FormSession<D> {
    /// Open for creation with empty defaults.
    pub fn open_create(&mut self, draft: D) {
        self.mode = FormMode::Create;
        self.draft = draft;
        self.state = State::Open { error: None };
    }

    /// Open for editing, seeded from the selected entity.
    pub fn open_edit(&mut self, draft: D) {
        self.mode = FormMode::Edit;
        self.draft = draft;
        self.state = State::Open { error: None };
    }

    /// Open read-only.
    pub fn open_view(&mut self, draft: D) {
        self.mode = FormMode::View;
        self.draft = draft;
        self.state = State::Open { error: None };
    }

    pub fn close(&mut self) {
        self.state = State::Closed;
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, State::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, State::Submitting)
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// The inline error from the last failed submit, if any.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            State::Open { error } => error.as_deref(),
            _ => None,
        }
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    /// Gate a submit attempt on client-side validation.
    ///
    /// On violation the session stays open with the messages inline and
    /// the caller gets `Err` -- no request body exists, so no network
    /// call can be made. On success the session enters `Submitting` and
    /// the caller receives the validated request body to send; it must
    /// then report [`submit_succeeded`](Self::submit_succeeded) or
    /// [`submit_failed`](Self::submit_failed).
    pub fn begin_submit(&mut self) -> Result<D::Output, Violations> {
        match self.draft.validate() {
            Ok(output) => {
                self.state = State::Submitting;
                Ok(output)
            }
            Err(violations) => {
                self.state = State::Open {
                    error: Some(violations.to_string()),
                };
                Err(violations)
            }
        }
    }

    /// The network call succeeded: close the form.
    pub fn submit_succeeded(&mut self) {
        self.state = State::Closed;
    }

    /// The network call failed: stay open, keep the draft, show the
    /// server's message verbatim (or the caller's fallback).
    pub fn submit_failed(&mut self, message: impl Into<String>) {
        self.state = State::Open {
            error: Some(message.into()),
        };
    }
}

// ── Concrete drafts ──────────────────────────────────────────────────

/// Draft for the create/edit subscription-package form.
#[derive(Debug, Clone, Default)]
pub struct PackageDraft {
    pub name: String,
    pub price: Option<f64>,
    pub vehicle_type: Option<VehicleType>,
    pub duration_type: Option<DurationType>,
    pub lot_id: Option<i64>,
    pub is_active: bool,
}

impl FormModel for PackageDraft {
    type Output = SubscriptionPackageCreate;

    fn validate(&self) -> Result<Self::Output, Violations> {
        let mut check = Checker::default();
        check.require("name", &self.name);
        let price = check.present("price", self.price);
        if let Some(price) = price {
            check.positive("price", price);
        }
        let vehicle_type = check.present("vehicleType", self.vehicle_type);
        let duration_type = check.present("durationType", self.duration_type);
        let lot_id = check.present("parkingLotId", self.lot_id);
        check.finish()?;

        // All `present` checks passed, so the defaults below are unreachable.
        Ok(SubscriptionPackageCreate {
            name: self.name.trim().to_owned(),
            price: price.unwrap_or_default(),
            vehicle_type: vehicle_type.map(|v| v.to_string()).unwrap_or_default(),
            duration_type: duration_type.map(|d| d.to_string()).unwrap_or_default(),
            parking_lot_id: lot_id.unwrap_or_default(),
            is_active: self.is_active,
        })
    }
}

/// Draft for the create/edit fee-config form.
#[derive(Debug, Clone, Default)]
pub struct FeeConfigDraft {
    pub rate: Option<f64>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}

impl FormModel for FeeConfigDraft {
    type Output = FeeConfigCreate;

    fn validate(&self) -> Result<Self::Output, Violations> {
        let mut check = Checker::default();
        let rate = check.present("rate", self.rate);
        if let Some(rate) = rate {
            check.positive("rate", rate);
        }
        let valid_from = check.present("validFrom", self.valid_from);
        check.date_order(self.valid_from, self.valid_until);
        check.finish()?;

        Ok(FeeConfigCreate {
            rate: rate.unwrap_or_default(),
            valid_from: valid_from.unwrap_or_default(),
            valid_until: self.valid_until,
        })
    }
}

/// Draft for the create/edit parking-lot form.
#[derive(Debug, Clone, Default)]
pub struct LotDraft {
    pub name: String,
    pub address_line: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub capacities: Vec<(VehicleType, u32)>,
}

impl FormModel for LotDraft {
    type Output = ParkingLotCreate;

    fn validate(&self) -> Result<Self::Output, Violations> {
        let mut check = Checker::default();
        check.require("name", &self.name);
        for &(vehicle_type, spaces) in &self.capacities {
            check.positive_int(&format!("capacity[{vehicle_type}]"), spaces);
        }
        check.finish()?;

        Ok(ParkingLotCreate {
            name: self.name.trim().to_owned(),
            address_line: self.address_line.clone(),
            district: self.district.clone(),
            city: self.city.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            capacities: self
                .capacities
                .iter()
                .map(|&(vehicle_type, spaces)| parkdeck_api::endpoints::LotCapacityDto {
                    vehicle_type: vehicle_type.to_string(),
                    spaces,
                })
                .collect(),
            pricing_rules: Vec::new(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().expect("valid date")
    }

    #[test]
    fn reversed_dates_reject_before_any_network_call() {
        let mut session = FormSession::<FeeConfigDraft>::closed();
        session.open_create(FeeConfigDraft {
            rate: Some(0.05),
            valid_from: Some(d("2025-06-01")),
            valid_until: Some(d("2025-01-01")),
        });

        // begin_submit yields no request body, so there is nothing to send.
        let result = session.begin_submit();
        assert!(result.is_err());
        assert!(session.is_open());
        assert!(!session.is_submitting());
        assert!(session.error().unwrap().contains("validFrom"));
    }

    #[test]
    fn valid_draft_enters_submitting_and_closes_on_success() {
        let mut session = FormSession::<FeeConfigDraft>::closed();
        session.open_create(FeeConfigDraft {
            rate: Some(0.05),
            valid_from: Some(d("2025-01-01")),
            valid_until: Some(d("2025-06-01")),
        });

        let body = session.begin_submit().unwrap();
        assert!(session.is_submitting());
        assert!((body.rate - 0.05).abs() < f64::EPSILON);

        session.submit_succeeded();
        assert!(!session.is_open());
    }

    #[test]
    fn server_failure_reopens_with_message_and_keeps_draft() {
        let mut session = FormSession::<PackageDraft>::closed();
        session.open_create(PackageDraft {
            name: "Monthly Car".into(),
            price: Some(120.0),
            vehicle_type: Some(VehicleType::Car),
            duration_type: Some(DurationType::Monthly),
            lot_id: Some(3),
            is_active: true,
        });

        session.begin_submit().unwrap();
        session.submit_failed("package name already exists");

        assert!(session.is_open());
        assert!(!session.is_submitting());
        assert_eq!(session.error(), Some("package name already exists"));
        assert_eq!(session.draft().name, "Monthly Car");
    }

    #[test]
    fn all_violations_are_reported_together() {
        let draft = PackageDraft::default();
        let err = draft.validate().unwrap_err();
        // name, price, vehicleType, durationType, parkingLotId
        assert_eq!(err.0.len(), 5);
    }

    #[test]
    fn zero_price_is_rejected() {
        let draft = PackageDraft {
            name: "Free".into(),
            price: Some(0.0),
            vehicle_type: Some(VehicleType::Car),
            duration_type: Some(DurationType::Monthly),
            lot_id: Some(1),
            is_active: true,
        };
        let err = draft.validate().unwrap_err();
        assert!(err.to_string().contains("price must be positive"));
    }
}
