//! Fee-schedule command handlers (operational + device ledgers).

use std::sync::Arc;

use tabled::Tabled;

use parkdeck_core::form::{FeeConfigDraft, FormModel};
use parkdeck_core::listing::{self, ListQuery};
use parkdeck_core::model::FeeConfig;
use parkdeck_core::{FeeKind, Portal};

use crate::cli::{FeeOpsCommand, FeesArgs, FeesLedger, GlobalOpts, ListArgs, SortDirArg};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct FeeRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "Until")]
    until: String,
    #[tabled(rename = "Active")]
    active: String,
}

impl From<&Arc<FeeConfig>> for FeeRow {
    fn from(fee: &Arc<FeeConfig>) -> Self {
        Self {
            id: fee.id,
            rate: format!("{:.4}", fee.rate),
            from: fee.valid_from.to_string(),
            until: fee
                .valid_until
                .map_or_else(|| "open".into(), |d| d.to_string()),
            active: if fee.is_active { "yes" } else { "no" }.into(),
        }
    }
}

pub async fn handle(portal: &Portal, args: FeesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (kind, ops) = match args.ledger {
        FeesLedger::Operational(ops) => (FeeKind::Operational, ops),
        FeesLedger::Device(ops) => (FeeKind::Device, ops),
    };

    match ops.command {
        FeeOpsCommand::List(list) => {
            portal.refresh_fees(kind).await?;
            let snapshot = portal.store().fees_snapshot(kind);
            let windowed = window(&snapshot, &list);
            output::emit_list(global, &windowed, |fee| FeeRow::from(fee), |fee| fee.id.to_string());
            Ok(())
        }

        FeeOpsCommand::Add {
            rate,
            valid_from,
            valid_until,
        } => {
            let body = validate_fee(rate, &valid_from, valid_until.as_deref())?;
            // The new record is injected into the local ledger
            // immediately; the next `list` refetch confirms it.
            let fee = portal.create_fee_config(kind, &body).await?;
            util::success(
                &format!("Fee config created (#{}, rate {:.4})", fee.id, fee.rate),
                global,
            );
            Ok(())
        }

        FeeOpsCommand::Update {
            config,
            rate,
            valid_from,
            valid_until,
        } => {
            let body = validate_fee(rate, &valid_from, valid_until.as_deref())?;
            portal.update_fee_config(kind, config, &body).await?;
            util::success("Fee config updated", global);
            Ok(())
        }

        FeeOpsCommand::Delete { config } => {
            if !util::confirm(&format!("Delete fee config #{config}?"), global.yes)? {
                return Ok(());
            }
            portal.delete_fee_config(kind, config).await?;
            util::success("Fee config deleted", global);
            Ok(())
        }
    }
}

/// Client-side window over the fully fetched ledger, newest rate first.
fn window(snapshot: &[Arc<FeeConfig>], list: &ListArgs) -> Vec<Arc<FeeConfig>> {
    if list.all {
        return snapshot.to_vec();
    }
    let compare: Box<listing::Comparator<Arc<FeeConfig>>> = match list.sort {
        SortDirArg::Asc => Box::new(|a, b| a.valid_from.cmp(&b.valid_from)),
        SortDirArg::Desc => Box::new(|a, b| b.valid_from.cmp(&a.valid_from)),
    };
    let query = ListQuery {
        search: None,
        page: usize::try_from(list.page).unwrap_or(0),
        page_size: usize::try_from(list.limit).unwrap_or(20).max(1),
    };
    listing::select_page(snapshot, &query, |_| true, |_| Vec::new(), Some(&compare)).items
}

/// Run the same client-side gate the TUI modal applies: parse the
/// dates, then validate presence, positivity, and ordering before
/// anything touches the network.
fn validate_fee(
    rate: f64,
    valid_from: &str,
    valid_until: Option<&str>,
) -> Result<parkdeck_core::FeeConfigCreate, CliError> {
    let draft = FeeConfigDraft {
        rate: Some(rate),
        valid_from: Some(util::parse_date("valid-from", valid_from)?),
        valid_until: valid_until
            .map(|v| util::parse_date("valid-until", v))
            .transpose()?,
    };
    Ok(draft.validate().map_err(parkdeck_core::CoreError::from)?)
}
