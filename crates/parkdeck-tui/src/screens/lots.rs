//! Parking-lot screen: table with status badges.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState},
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use parkdeck_core::Portal;

use crate::screens::ScreenCommand;
use crate::theme;

pub struct LotsScreen {
    pub table: TableState,
    pub loading: bool,
    pub throbber: ThrobberState,
}

impl LotsScreen {
    pub fn new() -> Self {
        Self {
            table: TableState::default(),
            loading: false,
            throbber: ThrobberState::default(),
        }
    }

    pub fn on_tick(&mut self) {
        if self.loading {
            self.throbber.calc_next();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, row_count: usize) -> Option<ScreenCommand> {
        match key.code {
            KeyCode::Char('r') => return Some(ScreenCommand::Refresh),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1, row_count),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1, row_count),
            KeyCode::Char('g') => self.table.select(Some(0)),
            KeyCode::Char('G') => {
                self.table.select(row_count.checked_sub(1));
            }
            _ => {}
        }
        None
    }

    fn move_selection(&mut self, delta: isize, row_count: usize) {
        if row_count == 0 {
            self.table.select(None);
            return;
        }
        let current = self.table.selected().unwrap_or(0);
        let next = current
            .saturating_add_signed(delta)
            .min(row_count.saturating_sub(1));
        self.table.select(Some(next));
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, portal: &Portal) {
        let lots = portal.store().lots_snapshot();

        let header = Row::new(vec!["ID", "Name", "Status", "City", "Spaces"])
            .style(theme::table_header());

        let rows: Vec<Row> = lots
            .iter()
            .map(|lot| {
                Row::new(vec![
                    Cell::from(lot.id.to_string()),
                    Cell::from(lot.name.clone()),
                    Cell::from(Span::styled(
                        lot.status.to_string(),
                        Style::default().fg(theme::lot_status_color(lot.status)),
                    )),
                    Cell::from(lot.city.clone().unwrap_or_default()),
                    Cell::from(lot.total_spaces().to_string()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let open = lots.iter().filter(|l| l.status.is_operational()).count();
        let title = format!(" Parking Lots ({open} open / {}) ", lots.len());
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Min(20),
                Constraint::Length(22),
                Constraint::Length(16),
                Constraint::Length(8),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(theme::table_selected());

        frame.render_stateful_widget(table, area, &mut self.table);

        if self.loading {
            let throbber = Throbber::default()
                .label("loading")
                .style(Style::default().fg(theme::SIGNAL_AMBER));
            let spot = Rect::new(area.right().saturating_sub(13), area.y, 11, 1);
            frame.render_stateful_widget(throbber, spot, &mut self.throbber);
        }
    }
}
