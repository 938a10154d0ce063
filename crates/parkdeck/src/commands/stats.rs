//! Statistics command handlers.

use chrono::{Duration, NaiveDate, Utc};

use parkdeck_core::model::{LotStats, PlatformStats};
use parkdeck_core::Portal;

use crate::cli::{GlobalOpts, StatsArgs, StatsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

fn resolve_range(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(NaiveDate, NaiveDate), CliError> {
    let today = Utc::now().date_naive();
    let to = match to {
        Some(value) => util::parse_date("to", value)?,
        None => today,
    };
    let from = match from {
        Some(value) => util::parse_date("from", value)?,
        None => to - Duration::days(30),
    };
    if from > to {
        return Err(CliError::Validation {
            field: "from".into(),
            reason: format!("'{from}' is after '{to}'"),
        });
    }
    Ok((from, to))
}

fn revenue_lines(revenue: &[parkdeck_core::RevenuePoint]) -> Vec<String> {
    let mut lines = Vec::with_capacity(revenue.len() + 1);
    if revenue.is_empty() {
        return lines;
    }
    lines.push("Revenue by day:".into());
    for point in revenue {
        lines.push(format!("  {}  {:>12.2}", point.date, point.amount));
    }
    lines
}

fn platform_detail(stats: &PlatformStats) -> String {
    let mut lines = vec![
        format!("Parking lots:         {}", stats.total_parking_lots),
        format!("Partners:             {}", stats.total_partners),
        format!("Active subscriptions: {}", stats.active_subscriptions),
        format!("Total revenue:        {:.2}", stats.total_revenue()),
    ];
    if !stats.subscriptions_by_status.is_empty() {
        lines.push("Subscriptions by status:".into());
        for (status, count) in &stats.subscriptions_by_status {
            lines.push(format!("  {status:<16} {count}"));
        }
    }
    lines.extend(revenue_lines(&stats.revenue_by_day));
    lines.join("\n")
}

fn lot_detail(stats: &LotStats) -> String {
    let mut lines = vec![
        format!("Lot:                  #{}", stats.lot_id),
        format!("Occupancy:            {:.1}%", stats.occupancy_rate * 100.0),
        format!("Active subscriptions: {}", stats.active_subscriptions),
    ];
    lines.extend(revenue_lines(&stats.revenue_by_day));
    lines.join("\n")
}

pub async fn handle(portal: &Portal, args: StatsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        StatsCommand::Platform { from, to } => {
            let (from, to) = resolve_range(from.as_deref(), to.as_deref())?;
            let stats = portal.platform_stats(from, to).await?;
            output::emit_one(global, &stats, platform_detail, |s| {
                s.total_parking_lots.to_string()
            });
            Ok(())
        }

        StatsCommand::Lot { lot, from, to } => {
            let (from, to) = resolve_range(from.as_deref(), to.as_deref())?;
            let stats = portal.lot_stats(lot, from, to).await?;
            output::emit_one(global, &stats, lot_detail, |s| s.lot_id.to_string());
            Ok(())
        }
    }
}
