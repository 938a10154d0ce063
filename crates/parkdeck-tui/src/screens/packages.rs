//! Package screen: table plus the create-package modal.
//!
//! The modal drives `FormSession<PackageDraft>` from parkdeck-core:
//! validation gates the submit before any network call, a server
//! rejection reopens the form with the message inline, and closing is
//! only possible from a terminal state.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
};
use strum::IntoEnumIterator;
use throbber_widgets_tui::{Throbber, ThrobberState};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use parkdeck_core::form::{FormSession, PackageDraft};
use parkdeck_core::{DurationType, Portal, VehicleType};

use crate::screens::{ScreenCommand, ToastLevel};
use crate::theme;

/// Modal fields in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Price,
    Vehicle,
    Duration,
    Lot,
}

const FIELDS: [Field; 5] = [
    Field::Name,
    Field::Price,
    Field::Vehicle,
    Field::Duration,
    Field::Lot,
];

pub struct PackagesScreen {
    pub table: TableState,
    pub loading: bool,
    pub throbber: ThrobberState,

    pub form: FormSession<PackageDraft>,
    field_index: usize,
    name_input: Input,
    price_input: Input,
    /// Index into the lots snapshot for the lot selector field.
    lot_index: usize,
}

impl PackagesScreen {
    pub fn new() -> Self {
        Self {
            table: TableState::default(),
            loading: false,
            throbber: ThrobberState::default(),
            form: FormSession::closed(),
            field_index: 0,
            name_input: Input::default(),
            price_input: Input::default(),
            lot_index: 0,
        }
    }

    pub fn on_tick(&mut self) {
        if self.loading {
            self.throbber.calc_next();
        }
    }

    fn field(&self) -> Field {
        FIELDS[self.field_index % FIELDS.len()]
    }

    pub fn handle_key(&mut self, key: KeyEvent, portal: &Portal) -> Option<ScreenCommand> {
        if self.form.is_open() {
            return self.handle_modal_key(key, portal);
        }

        let row_count = portal.store().package_count();
        match key.code {
            KeyCode::Char('r') => return Some(ScreenCommand::Refresh),
            KeyCode::Char('n') => self.open_create_modal(portal),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1, row_count),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1, row_count),
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

    fn open_create_modal(&mut self, portal: &Portal) {
        self.name_input = Input::default();
        self.price_input = Input::default();
        self.field_index = 0;
        self.lot_index = 0;

        let lots = portal.store().lots_snapshot();
        self.form.open_create(PackageDraft {
            vehicle_type: Some(VehicleType::Car),
            duration_type: Some(DurationType::Monthly),
            lot_id: lots.first().map(|l| l.id),
            is_active: true,
            ..PackageDraft::default()
        });
    }

    fn handle_modal_key(&mut self, key: KeyEvent, portal: &Portal) -> Option<ScreenCommand> {
        if self.form.is_submitting() {
            // A submit is in flight; only the outcome can move the form.
            return None;
        }

        match key.code {
            KeyCode::Esc => {
                self.form.close();
                return None;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.field_index = (self.field_index + 1) % FIELDS.len();
                return None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.field_index = (self.field_index + FIELDS.len() - 1) % FIELDS.len();
                return None;
            }
            KeyCode::Enter => return self.submit(portal),
            _ => {}
        }

        match self.field() {
            Field::Name => {
                self.name_input
                    .handle_event(&crossterm::event::Event::Key(key));
            }
            Field::Price => {
                self.price_input
                    .handle_event(&crossterm::event::Event::Key(key));
            }
            Field::Vehicle => {
                if let KeyCode::Left | KeyCode::Right = key.code {
                    let draft = self.form.draft_mut();
                    draft.vehicle_type = cycle(
                        VehicleType::iter().filter(|v| *v != VehicleType::Unknown),
                        draft.vehicle_type,
                        key.code == KeyCode::Right,
                    );
                }
            }
            Field::Duration => {
                if let KeyCode::Left | KeyCode::Right = key.code {
                    let draft = self.form.draft_mut();
                    draft.duration_type = cycle(
                        DurationType::iter().filter(|d| *d != DurationType::Unknown),
                        draft.duration_type,
                        key.code == KeyCode::Right,
                    );
                }
            }
            Field::Lot => {
                if let KeyCode::Left | KeyCode::Right = key.code {
                    let lots = portal.store().lots_snapshot();
                    if !lots.is_empty() {
                        let len = lots.len();
                        self.lot_index = if key.code == KeyCode::Right {
                            (self.lot_index + 1) % len
                        } else {
                            (self.lot_index + len - 1) % len
                        };
                        self.form.draft_mut().lot_id = lots.get(self.lot_index).map(|l| l.id);
                    }
                }
            }
        }
        None
    }

    fn submit(&mut self, _portal: &Portal) -> Option<ScreenCommand> {
        // Sync the text inputs into the draft before the validation gate.
        let price_text = self.price_input.value().trim().to_owned();
        if !price_text.is_empty() && price_text.parse::<f64>().is_err() {
            return Some(ScreenCommand::Toast(
                format!("'{price_text}' is not a valid price"),
                ToastLevel::Error,
            ));
        }
        {
            let draft = self.form.draft_mut();
            draft.name = self.name_input.value().trim().to_owned();
            draft.price = price_text.parse().ok();
        }

        match self.form.begin_submit() {
            Ok(body) => Some(ScreenCommand::SubmitPackage(body)),
            // Stays open; the violations render inline and toast.
            Err(violations) => Some(ScreenCommand::Toast(
                violations.to_string(),
                ToastLevel::Error,
            )),
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&mut self, frame: &mut Frame, area: Rect, portal: &Portal) {
        self.render_table(frame, area, portal);
        if self.form.is_open() {
            self.render_modal(frame, area, portal);
        }

        if self.loading {
            let throbber = Throbber::default()
                .label("loading")
                .style(Style::default().fg(theme::SIGNAL_AMBER));
            let spot = Rect::new(area.right().saturating_sub(13), area.y, 11, 1);
            frame.render_stateful_widget(throbber, spot, &mut self.throbber);
        }
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect, portal: &Portal) {
        let packages = portal.store().packages_snapshot();

        let header = Row::new(vec!["ID", "Name", "Price", "Vehicle", "Period", "Lot", "Active"])
            .style(theme::table_header());

        let rows: Vec<Row> = packages
            .iter()
            .map(|pkg| {
                Row::new(vec![
                    Cell::from(pkg.id.to_string()),
                    Cell::from(pkg.name.clone()),
                    Cell::from(format!("{:.2}", pkg.price)),
                    Cell::from(pkg.vehicle_type.to_string()),
                    Cell::from(pkg.duration_type.to_string()),
                    Cell::from(format!("#{}", pkg.lot_id)),
                    Cell::from(Span::styled(
                        if pkg.is_active { "yes" } else { "no" },
                        Style::default().fg(if pkg.is_active {
                            theme::SUCCESS_GREEN
                        } else {
                            theme::DIM_WHITE
                        }),
                    )),
                ])
                .style(theme::table_row())
            })
            .collect();

        let title = format!(" Packages ({})  [n] new ", packages.len());
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
                Constraint::Min(18),
                Constraint::Length(10),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(8),
                Constraint::Length(8),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(theme::table_selected());

        frame.render_stateful_widget(table, area, &mut self.table);
    }

    fn render_modal(&mut self, frame: &mut Frame, area: Rect, portal: &Portal) {
        let width = 52u16.min(area.width.saturating_sub(4));
        let height = 14u16.min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let modal_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, modal_area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            modal_area,
        );

        let title = if self.form.is_submitting() {
            " New Package (saving...) "
        } else {
            " New Package "
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let draft = self.form.draft();
        let lots = portal.store().lots_snapshot();
        let lot_label = draft
            .lot_id
            .and_then(|id| lots.iter().find(|l| l.id == id))
            .map_or_else(|| "(no lots)".into(), |l| l.name.clone());

        let mut lines = vec![
            self.field_line(Field::Name, "Name", self.name_input.value()),
            self.field_line(Field::Price, "Price", self.price_input.value()),
            self.field_line(
                Field::Vehicle,
                "Vehicle",
                &draft
                    .vehicle_type
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            ),
            self.field_line(
                Field::Duration,
                "Period",
                &draft
                    .duration_type
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
            ),
            self.field_line(Field::Lot, "Lot", &lot_label),
            Line::from(""),
            Line::from(vec![
                Span::styled("Tab", theme::key_hint_key()),
                Span::styled(" next  ", theme::key_hint()),
                Span::styled("←/→", theme::key_hint_key()),
                Span::styled(" choose  ", theme::key_hint()),
                Span::styled("Enter", theme::key_hint_key()),
                Span::styled(" save  ", theme::key_hint()),
                Span::styled("Esc", theme::key_hint_key()),
                Span::styled(" cancel", theme::key_hint()),
            ]),
        ];

        if let Some(error) = self.form.error() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                error.to_owned(),
                Style::default().fg(theme::ERROR_RED),
            )));
        }

        frame.render_widget(Paragraph::new(lines).wrap(ratatui::widgets::Wrap { trim: true }), inner);
    }

    fn field_line(&self, field: Field, label: &str, value: &str) -> Line<'static> {
        let marker = if self.field() == field { "› " } else { "  " };
        let label_style = if self.field() == field {
            Style::default().fg(theme::SIGNAL_AMBER)
        } else {
            theme::key_hint()
        };
        Line::from(vec![
            Span::styled(format!("{marker}{label:<8} "), label_style),
            Span::styled(value.to_owned(), theme::table_row()),
        ])
    }
}

/// Step through an enum's variants in either direction.
fn cycle<T: PartialEq + Copy>(
    iter: impl Iterator<Item = T>,
    current: Option<T>,
    forward: bool,
) -> Option<T> {
    let options: Vec<T> = iter.collect();
    if options.is_empty() {
        return current;
    }
    let idx = current
        .and_then(|c| options.iter().position(|o| *o == c))
        .unwrap_or(0);
    let len = options.len();
    let next = if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    };
    options.get(next).copied()
}
