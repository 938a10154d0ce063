//! Dashboard screen: stat tiles + revenue chart.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Paragraph},
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use parkdeck_core::{Portal, RevenuePoint};

use crate::screens::ScreenCommand;
use crate::theme;

/// Aggregates the dashboard renders, assembled role-appropriately by
/// the fetch task (platform stats for admins, lot stats for partners).
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub revenue: Vec<RevenuePoint>,
    pub active_subscriptions: u64,
    pub total_lots: Option<u64>,
    pub total_partners: Option<u64>,
    pub occupancy: Option<f64>,
}

pub struct DashboardScreen {
    pub data: Option<DashboardData>,
    pub loading: bool,
    pub throbber: ThrobberState,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            data: None,
            loading: false,
            throbber: ThrobberState::default(),
        }
    }

    pub fn on_tick(&mut self) {
        if self.loading {
            self.throbber.calc_next();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ScreenCommand> {
        match key.code {
            KeyCode::Char('r') => Some(ScreenCommand::Refresh),
            _ => None,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, portal: &Portal) {
        let layout = Layout::vertical([
            Constraint::Length(5), // stat tiles
            Constraint::Min(5),    // revenue chart
        ])
        .split(area);

        self.render_tiles(frame, layout[0], portal);
        self.render_revenue(frame, layout[1]);

        if self.loading {
            let throbber = Throbber::default()
                .label("loading")
                .style(Style::default().fg(theme::SIGNAL_AMBER));
            let spot = Rect::new(area.right().saturating_sub(12), area.y, 11, 1);
            frame.render_stateful_widget(throbber, spot, &mut self.throbber);
        }
    }

    fn render_tiles(&self, frame: &mut Frame, area: Rect, portal: &Portal) {
        let tiles = Layout::horizontal([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(area);

        let store = portal.store();
        let lots = self
            .data
            .as_ref()
            .and_then(|d| d.total_lots)
            .map_or_else(|| store.lot_count().to_string(), |n| n.to_string());
        let packages = store.package_count().to_string();
        let active = self
            .data
            .as_ref()
            .map_or_else(|| "-".into(), |d| d.active_subscriptions.to_string());
        let fourth = match self.data.as_ref() {
            Some(d) if d.total_partners.is_some() => (
                "Partners",
                d.total_partners.unwrap_or_default().to_string(),
            ),
            Some(d) if d.occupancy.is_some() => (
                "Occupancy",
                format!("{:.0}%", d.occupancy.unwrap_or_default() * 100.0),
            ),
            _ => ("Revenue", self.total_revenue_label()),
        };

        render_tile(frame, tiles[0], "Lots", &lots);
        render_tile(frame, tiles[1], "Packages", &packages);
        render_tile(frame, tiles[2], "Active subs", &active);
        render_tile(frame, tiles[3], fourth.0, &fourth.1);
    }

    fn total_revenue_label(&self) -> String {
        self.data.as_ref().map_or_else(
            || "-".into(),
            |d| format!("{:.0}", d.revenue.iter().map(|p| p.amount).sum::<f64>()),
        )
    }

    fn render_revenue(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Revenue (last 30 days) ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let Some(data) = self.data.as_ref().filter(|d| !d.revenue.is_empty()) else {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "no revenue data -- press r to refresh",
                    theme::key_hint(),
                ))),
                inner,
            );
            return;
        };

        // One bar per day, labeled by day-of-month.
        let bars: Vec<Bar> = data
            .revenue
            .iter()
            .map(|point| {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
                let value = point.amount.max(0.0).round() as u64;
                Bar::default()
                    .value(value)
                    .label(Line::from(point.date.format("%d").to_string()))
                    .style(Style::default().fg(theme::METER_BLUE))
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .bar_width(3)
            .bar_gap(1)
            .data(BarGroup::default().bars(&bars));

        frame.render_widget(chart, area);
    }
}

fn render_tile(frame: &mut Frame, area: Rect, label: &str, value: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled(label.to_owned(), theme::key_hint())),
        Line::from(Span::styled(
            value.to_owned(),
            Style::default()
                .fg(theme::SIGNAL_AMBER)
                .add_modifier(ratatui::style::Modifier::BOLD),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}
