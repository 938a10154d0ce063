//! Raw user-subscription command handlers (one (lot, package) pair per
//! call -- the backend's mandatory-filter shape, exposed as-is).

use std::sync::Arc;

use tabled::Tabled;

use parkdeck_core::listing::{self, ListQuery};
use parkdeck_core::model::UserSubscription;
use parkdeck_core::Portal;

use crate::cli::{GlobalOpts, ListArgs, SortDirArg, SubsArgs, SubsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SubRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Plate")]
    plate: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "Until")]
    until: String,
}

impl From<&Arc<UserSubscription>> for SubRow {
    fn from(sub: &Arc<UserSubscription>) -> Self {
        Self {
            id: sub.id,
            user: sub.user_id.to_string(),
            plate: sub.license_plate.clone().unwrap_or_default(),
            status: sub.status.to_string(),
            from: sub.valid_from.map(|d| d.to_string()).unwrap_or_default(),
            until: sub.valid_until.map(|d| d.to_string()).unwrap_or_default(),
        }
    }
}

fn sub_detail(sub: &UserSubscription) -> String {
    [
        format!("ID:       {}", sub.id),
        format!("User:     {}", sub.user_id),
        format!("Package:  #{}", sub.package_id),
        format!("Lot:      #{}", sub.lot_id),
        format!("Plate:    {}", sub.license_plate.as_deref().unwrap_or("-")),
        format!("Status:   {}", sub.status),
        format!(
            "Validity: {} -> {}",
            sub.valid_from.map_or_else(|| "-".into(), |d| d.to_string()),
            sub.valid_until.map_or_else(|| "-".into(), |d| d.to_string()),
        ),
    ]
    .join("\n")
}

pub async fn handle(portal: &Portal, args: SubsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        SubsCommand::List { lot, package, list } => {
            portal.refresh_subscriptions(lot, package).await?;
            let snapshot = portal.store().subscriptions_snapshot();
            let windowed = window(&snapshot, &list);
            output::emit_list(global, &windowed, |sub| SubRow::from(sub), |sub| sub.id.to_string());
            Ok(())
        }

        SubsCommand::Get { subscription } => {
            let sub = portal.get_subscription(subscription).await?;
            output::emit_one(global, &sub, sub_detail, |s| s.id.to_string());
            Ok(())
        }
    }
}

/// Client-side window over the fully fetched pair result.
fn window(
    snapshot: &[Arc<UserSubscription>],
    list: &ListArgs,
) -> Vec<Arc<UserSubscription>> {
    if list.all {
        return snapshot.to_vec();
    }
    let compare: Box<listing::Comparator<Arc<UserSubscription>>> = match list.sort {
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
