//! Subscription-package command handlers.

use std::sync::Arc;

use tabled::Tabled;

use parkdeck_core::form::{FormModel, PackageDraft};
use parkdeck_core::listing::{self, ListQuery};
use parkdeck_core::model::{DurationType, SubscriptionPackage, VehicleType};
use parkdeck_core::Portal;

use crate::cli::{GlobalOpts, ListArgs, PackagesArgs, PackagesCommand, SortDirArg};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PackageRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Vehicle")]
    vehicle: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Lot")]
    lot: i64,
    #[tabled(rename = "Active")]
    active: String,
}

impl From<&Arc<SubscriptionPackage>> for PackageRow {
    fn from(pkg: &Arc<SubscriptionPackage>) -> Self {
        Self {
            id: pkg.id,
            name: pkg.name.clone(),
            price: format!("{:.2}", pkg.price),
            vehicle: pkg.vehicle_type.to_string(),
            period: pkg.duration_type.to_string(),
            lot: pkg.lot_id,
            active: if pkg.is_active { "yes" } else { "no" }.into(),
        }
    }
}

fn package_detail(pkg: &SubscriptionPackage) -> String {
    [
        format!("ID:       {}", pkg.id),
        format!("Name:     {}", pkg.name),
        format!("Price:    {:.2}", pkg.price),
        format!("Vehicle:  {}", pkg.vehicle_type),
        format!("Period:   {}", pkg.duration_type),
        format!("Lot:      #{}", pkg.lot_id),
        format!("Active:   {}", pkg.is_active),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    portal: &Portal,
    args: PackagesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PackagesCommand::List(list) => {
            portal.refresh_packages().await?;
            let snapshot = portal.store().packages_snapshot();
            let windowed = window(&snapshot, &list);
            output::emit_list(global, &windowed, |pkg| PackageRow::from(pkg), |pkg| pkg.id.to_string());
            Ok(())
        }

        PackagesCommand::Get { package } => {
            let pkg = portal.get_package(package).await?;
            output::emit_one(global, &pkg, package_detail, |p| p.id.to_string());
            Ok(())
        }

        PackagesCommand::Create {
            name,
            price,
            vehicle_type,
            duration_type,
            lot,
            inactive,
        } => {
            // Same validation gate the TUI modal uses: nothing invalid
            // reaches the wire.
            let draft = PackageDraft {
                name,
                price: Some(price),
                vehicle_type: parse_vehicle(&vehicle_type)?,
                duration_type: parse_duration(&duration_type)?,
                lot_id: Some(lot),
                is_active: !inactive,
            };
            let body = draft.validate().map_err(parkdeck_core::CoreError::from)?;

            let pkg = portal.create_package(&body).await?;
            util::success(&format!("Package created (#{})", pkg.id), global);
            Ok(())
        }

        PackagesCommand::Update { package, from_file } => {
            let body = serde_json::from_value(util::read_json_file(&from_file)?)?;
            portal.update_package(package, &body).await?;
            util::success("Package updated", global);
            Ok(())
        }

        PackagesCommand::Delete { package } => {
            if !util::confirm(&format!("Delete package #{package}?"), global.yes)? {
                return Ok(());
            }
            portal.delete_package(package).await?;
            util::success("Package deleted", global);
            Ok(())
        }
    }
}

fn parse_vehicle(value: &str) -> Result<Option<VehicleType>, CliError> {
    value
        .to_uppercase()
        .parse()
        .map(Some)
        .map_err(|_| CliError::Validation {
            field: "vehicle-type".into(),
            reason: format!("unknown vehicle type '{value}'"),
        })
}

fn parse_duration(value: &str) -> Result<Option<DurationType>, CliError> {
    value
        .to_uppercase()
        .parse()
        .map(Some)
        .map_err(|_| CliError::Validation {
            field: "duration-type".into(),
            reason: format!("unknown duration type '{value}'"),
        })
}

/// Client-side window over the fully fetched snapshot.
fn window(
    snapshot: &[Arc<SubscriptionPackage>],
    list: &ListArgs,
) -> Vec<Arc<SubscriptionPackage>> {
    if list.all {
        return snapshot.to_vec();
    }
    let compare: Box<listing::Comparator<Arc<SubscriptionPackage>>> = match list.sort {
        SortDirArg::Asc => Box::new(|a, b| a.id.cmp(&b.id)),
        SortDirArg::Desc => Box::new(|a, b| b.id.cmp(&a.id)),
    };
    let query = ListQuery {
        search: None,
        page: usize::try_from(list.page).unwrap_or(0),
        page_size: usize::try_from(list.limit).unwrap_or(20).max(1),
    };
    listing::select_page(snapshot, &query, |_| true, |_| Vec::new(), Some(&compare)).items
}
