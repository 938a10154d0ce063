//! The aggregated partner-subscribers view.
//!
//! One command drives the whole composite pipeline: cross-product
//! fetch over the partner's (lot, package) pairs, user-cache joins,
//! then client-side search/filter/pagination of the assembled rows.

use tabled::Tabled;

use parkdeck_core::model::SubscriptionStatus;
use parkdeck_core::{ListQuery, Portal, SubscriberRow};

use crate::cli::{GlobalOpts, SubscribersArgs, SubscribersCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct RosterRow {
    #[tabled(rename = "Subscriber")]
    subscriber: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Plate")]
    plate: String,
    #[tabled(rename = "Lot")]
    lot: String,
    #[tabled(rename = "Package")]
    package: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Until")]
    until: String,
}

impl From<&SubscriberRow> for RosterRow {
    fn from(row: &SubscriberRow) -> Self {
        Self {
            subscriber: row.user_label(),
            email: row.user_email.clone().unwrap_or_default(),
            plate: row.subscription.license_plate.clone().unwrap_or_default(),
            lot: row.lot_name.clone(),
            package: row.package_name.clone(),
            status: row.subscription.status.to_string(),
            until: row
                .subscription
                .valid_until
                .map(|d| d.to_string())
                .unwrap_or_default(),
        }
    }
}

pub async fn handle(
    portal: &Portal,
    args: SubscribersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SubscribersCommand::List {
            search,
            status,
            page,
            page_size,
        } => {
            let status = match status {
                Some(ref value) => Some(parse_status(value)?),
                None => None,
            };

            // The fan-out can issue lots × packages request chains;
            // show progress while it runs.
            let spinner = progress_spinner(global);
            let result = portal.refresh_roster().await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            result?;

            let query = ListQuery {
                search,
                page,
                page_size: page_size.max(1),
            };
            let roster = portal.roster_page(&query, status);

            output::emit_list(global, &roster.items, |row| RosterRow::from(row), |row| {
                row.subscription.id.to_string()
            });

            if !global.quiet && matches!(global.output, crate::cli::OutputFormat::Table) {
                let active = portal
                    .store()
                    .roster_snapshot()
                    .iter()
                    .filter(|row| row.subscription.status.is_active())
                    .count();
                eprintln!(
                    "page {}/{} ({} subscribers, {active} active)",
                    roster.page + 1,
                    roster.total_pages.max(1),
                    roster.total_elements,
                );
            }
            Ok(())
        }
    }
}

fn parse_status(value: &str) -> Result<SubscriptionStatus, CliError> {
    value
        .to_uppercase()
        .parse()
        .map_err(|_| CliError::Validation {
            field: "status".into(),
            reason: format!("unknown subscription status '{value}'"),
        })
}

fn progress_spinner(global: &GlobalOpts) -> Option<indicatif::ProgressBar> {
    if global.quiet || !output::should_color(&global.color) {
        return None;
    }
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_message("assembling subscriber roster...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    Some(spinner)
}
