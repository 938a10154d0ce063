//! Subscriber roster screen: search input, status filter, pagination.
//!
//! The roster itself is assembled by the Portal (cross-product fetch +
//! lookup joins); this screen only windows the published rows, so every
//! keystroke in the search box is pure in-memory work.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use parkdeck_core::{ListQuery, Portal, SubscriptionStatus};

use crate::screens::ScreenCommand;
use crate::theme;

/// Cycle order for the status filter key.
const STATUS_CYCLE: [Option<SubscriptionStatus>; 6] = [
    None,
    Some(SubscriptionStatus::Active),
    Some(SubscriptionStatus::PendingPayment),
    Some(SubscriptionStatus::Expired),
    Some(SubscriptionStatus::Cancelled),
    Some(SubscriptionStatus::Inactive),
];

pub struct SubscribersScreen {
    pub search: Input,
    pub search_mode: bool,
    status_index: usize,
    pub page: usize,
    pub page_size: usize,
    pub loading: bool,
    pub throbber: ThrobberState,
}

impl SubscribersScreen {
    pub fn new() -> Self {
        Self {
            search: Input::default(),
            search_mode: false,
            status_index: 0,
            page: 0,
            page_size: 15,
            loading: false,
            throbber: ThrobberState::default(),
        }
    }

    pub fn status_filter(&self) -> Option<SubscriptionStatus> {
        STATUS_CYCLE[self.status_index % STATUS_CYCLE.len()]
    }

    pub fn query(&self) -> ListQuery {
        let term = self.search.value().trim();
        ListQuery {
            search: (!term.is_empty()).then(|| term.to_owned()),
            page: self.page,
            page_size: self.page_size,
        }
    }

    pub fn on_tick(&mut self) {
        if self.loading {
            self.throbber.calc_next();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ScreenCommand> {
        if self.search_mode {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => self.search_mode = false,
                _ => {
                    self.search
                        .handle_event(&crossterm::event::Event::Key(key));
                    // New term, new window.
                    self.page = 0;
                }
            }
            return None;
        }

        match key.code {
            KeyCode::Char('r') => return Some(ScreenCommand::Refresh),
            KeyCode::Char('/') => self.search_mode = true,
            KeyCode::Char('f') => {
                self.status_index = (self.status_index + 1) % STATUS_CYCLE.len();
                self.page = 0;
            }
            KeyCode::Right | KeyCode::Char('n') => self.page = self.page.saturating_add(1),
            KeyCode::Left | KeyCode::Char('p') => self.page = self.page.saturating_sub(1),
            _ => {}
        }
        None
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, portal: &Portal) {
        let layout = Layout::vertical([
            Constraint::Length(3), // search + filter bar
            Constraint::Min(3),    // table
            Constraint::Length(1), // pager footer
        ])
        .split(area);

        self.render_search_bar(frame, layout[0]);

        // Clamp the page to the filtered result before rendering.
        let mut query = self.query();
        let mut page = portal.roster_page(&query, self.status_filter());
        if query.page >= page.total_pages && page.total_pages > 0 {
            self.page = page.total_pages - 1;
            query.page = self.page;
            page = portal.roster_page(&query, self.status_filter());
        }

        self.render_table(frame, layout[1], &page);
        self.render_footer(frame, layout[2], &page);

        if self.loading {
            let throbber = Throbber::default()
                .label("fetching roster")
                .style(Style::default().fg(theme::SIGNAL_AMBER));
            let spot = Rect::new(area.right().saturating_sub(20), area.y, 18, 1);
            frame.render_stateful_widget(throbber, spot, &mut self.throbber);
        }
    }

    fn render_search_bar(&self, frame: &mut Frame, area: Rect) {
        let filter_label = self
            .status_filter()
            .map_or_else(|| "all".into(), |s| s.to_string());
        let title = format!(" Search (/) -- filter (f): {filter_label} ");

        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.search_mode {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text = if self.search.value().is_empty() && !self.search_mode {
            Line::from(Span::styled(
                "type / then a name, email, plate, lot, or package",
                theme::key_hint(),
            ))
        } else {
            Line::from(self.search.value().to_owned())
        };
        frame.render_widget(Paragraph::new(text), inner);

        if self.search_mode {
            // Put the terminal cursor where the input expects it.
            #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
            let cursor_x = inner.x + self.search.visual_cursor() as u16;
            frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
        }
    }

    fn render_table(
        &self,
        frame: &mut Frame,
        area: Rect,
        page: &parkdeck_core::ListPage<parkdeck_core::SubscriberRow>,
    ) {
        let header = Row::new(vec![
            "Subscriber",
            "Email",
            "Plate",
            "Lot",
            "Package",
            "Status",
            "Until",
        ])
        .style(theme::table_header());

        let rows: Vec<Row> = page
            .items
            .iter()
            .map(|row| {
                let status = row.subscription.status;
                Row::new(vec![
                    Cell::from(row.user_label()),
                    Cell::from(row.user_email.clone().unwrap_or_default()),
                    Cell::from(row.subscription.license_plate.clone().unwrap_or_default()),
                    Cell::from(row.lot_name.clone()),
                    Cell::from(row.package_name.clone()),
                    Cell::from(Span::styled(
                        status.to_string(),
                        Style::default().fg(theme::subscription_status_color(status)),
                    )),
                    Cell::from(
                        row.subscription
                            .valid_until
                            .map(|d| d.to_string())
                            .unwrap_or_default(),
                    ),
                ])
                .style(theme::table_row())
            })
            .collect();

        let block = Block::default()
            .title(" Subscribers ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let table = Table::new(
            rows,
            [
                Constraint::Min(18),
                Constraint::Min(20),
                Constraint::Length(10),
                Constraint::Length(16),
                Constraint::Length(16),
                Constraint::Length(16),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .block(block);

        frame.render_widget(table, area);
    }

    fn render_footer(
        &self,
        frame: &mut Frame,
        area: Rect,
        page: &parkdeck_core::ListPage<parkdeck_core::SubscriberRow>,
    ) {
        let line = Line::from(vec![
            Span::styled(
                format!(
                    " page {}/{}  ({} subscribers) ",
                    page.page + 1,
                    page.total_pages.max(1),
                    page.total_elements,
                ),
                theme::key_hint(),
            ),
            Span::styled("←/→", theme::key_hint_key()),
            Span::styled(" page  ", theme::key_hint()),
            Span::styled("r", theme::key_hint_key()),
            Span::styled(" refresh", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}
