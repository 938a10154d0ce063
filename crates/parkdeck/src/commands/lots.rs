//! Parking-lot command handlers.

use std::sync::Arc;

use tabled::Tabled;

use parkdeck_core::listing::{self, ListQuery};
use parkdeck_core::model::{LotStatus, ParkingLot};
use parkdeck_core::{form::FormModel, Portal};

use crate::cli::{GlobalOpts, ListArgs, LotsArgs, LotsCommand, SortDirArg};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct LotRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Spaces")]
    spaces: u32,
}

impl From<&Arc<ParkingLot>> for LotRow {
    fn from(lot: &Arc<ParkingLot>) -> Self {
        Self {
            id: lot.id,
            name: lot.name.clone(),
            status: lot.status.to_string(),
            city: lot.city.clone().unwrap_or_default(),
            spaces: lot.total_spaces(),
        }
    }
}

fn lot_detail(lot: &ParkingLot) -> String {
    let mut lines = vec![
        format!("ID:      {}", lot.id),
        format!("Name:    {}", lot.name),
        format!("Status:  {}", lot.status),
        format!("Address: {}", lot.address()),
        format!("Spaces:  {}", lot.total_spaces()),
    ];
    if let (Some(lat), Some(lng)) = (lot.latitude, lot.longitude) {
        lines.push(format!("Coords:  {lat:.6}, {lng:.6}"));
    }
    if !lot.capacities.is_empty() {
        lines.push("Capacity:".into());
        for cap in &lot.capacities {
            lines.push(format!("  - {}: {}", cap.vehicle_type, cap.spaces));
        }
    }
    if !lot.pricing_rules.is_empty() {
        lines.push("Pricing:".into());
        for rule in &lot.pricing_rules {
            lines.push(format!(
                "  - {}: {:.2} first {}min, +{:.2}/{}min",
                rule.vehicle_type,
                rule.initial_charge,
                rule.initial_minutes,
                rule.step_rate,
                rule.step_minutes,
            ));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(portal: &Portal, args: LotsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        LotsCommand::List(list) => {
            portal.refresh_lots().await?;
            let snapshot = portal.store().lots_snapshot();
            let windowed = window(&snapshot, &list);
            output::emit_list(global, &windowed, |lot| LotRow::from(lot), |lot| lot.id.to_string());
            Ok(())
        }

        LotsCommand::Get { lot } => {
            let lot = portal.get_lot(lot).await?;
            output::emit_one(global, &lot, lot_detail, |l| l.id.to_string());
            Ok(())
        }

        LotsCommand::Create {
            name,
            address,
            district,
            city,
            lat,
            lng,
            from_file,
        } => {
            let body = if let Some(ref path) = from_file {
                serde_json::from_value(util::read_json_file(path)?)?
            } else {
                // Same validation gate the TUI modal uses.
                let draft = parkdeck_core::form::LotDraft {
                    name: name.unwrap_or_default(),
                    address_line: address,
                    district,
                    city,
                    latitude: lat,
                    longitude: lng,
                    capacities: Vec::new(),
                };
                draft
                    .validate()
                    .map_err(parkdeck_core::CoreError::from)?
            };

            let lot = portal.create_lot(&body).await?;
            util::success(&format!("Parking lot created (#{})", lot.id), global);
            Ok(())
        }

        LotsCommand::Update { lot, from_file } => {
            let body = serde_json::from_value(util::read_json_file(&from_file)?)?;
            portal.update_lot(lot, &body).await?;
            util::success("Parking lot updated", global);
            Ok(())
        }

        LotsCommand::Delete { lot } => {
            if !util::confirm(
                &format!("Delete parking lot #{lot}? This is destructive."),
                global.yes,
            )? {
                return Ok(());
            }
            portal.delete_lot(lot).await?;
            util::success("Parking lot deleted", global);
            Ok(())
        }

        LotsCommand::SetStatus { lot, status } => {
            let status: LotStatus =
                status
                    .to_uppercase()
                    .parse()
                    .map_err(|_| CliError::Validation {
                        field: "status".into(),
                        reason: format!("unknown lot status '{status}'"),
                    })?;
            let lot = portal.set_lot_status(lot, status).await?;
            util::success(&format!("Lot #{} is now {}", lot.id, lot.status), global);
            Ok(())
        }

        LotsCommand::Export { file } => {
            let bytes = portal.export_lots().await?;
            std::fs::write(&file, &bytes)?;
            util::success(
                &format!("Exported {} bytes to {}", bytes.len(), file.display()),
                global,
            );
            Ok(())
        }

        LotsCommand::Import { file } => {
            let payload = std::fs::read(&file)?;
            let (imported, failed) = portal.import_lots(payload).await?;
            util::success(
                &format!("Imported {imported} lots ({failed} rows failed)"),
                global,
            );
            Ok(())
        }
    }
}

/// Client-side window over the fully fetched snapshot.
fn window(snapshot: &[Arc<ParkingLot>], list: &ListArgs) -> Vec<Arc<ParkingLot>> {
    if list.all {
        return snapshot.to_vec();
    }
    let compare: Box<listing::Comparator<Arc<ParkingLot>>> = match list.sort {
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
