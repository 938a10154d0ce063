//! Application core — event loop, screen management, fetch dispatch.
//!
//! Screens hand back [`ScreenCommand`]s; the app spawns the actual
//! network work and routes every outcome through one channel. A fetch
//! only ever starts from a discrete event (screen activation, refresh
//! key, modal submit) -- there is no polling loop. Stale-response
//! protection lives in the Portal's fetch gates, not here.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use parkdeck_core::{CoreError, Portal, Role, SubscriptionPackage, SubscriptionPackageCreate};

use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::dashboard::{DashboardData, DashboardScreen};
use crate::screens::lots::LotsScreen;
use crate::screens::packages::PackagesScreen;
use crate::screens::subscribers::SubscribersScreen;
use crate::screens::{ScreenCommand, ToastLevel};
use crate::theme;
use crate::tui::Tui;

const TOAST_TTL: Duration = Duration::from_secs(4);

/// A transient notification (success=green, error=red, info=blue).
struct Toast {
    message: String,
    level: ToastLevel,
    expires: Instant,
}

/// Completed background work, routed back into the event loop.
enum FetchOutcome {
    Dashboard(Result<DashboardData, CoreError>),
    Lots(Result<bool, CoreError>),
    Roster(Result<bool, CoreError>),
    Packages(Result<bool, CoreError>),
    PackageCreated(Result<SubscriptionPackage, CoreError>),
}

/// Top-level application state and event loop.
pub struct App {
    portal: Portal,
    active: ScreenId,
    running: bool,
    help_visible: bool,

    dashboard: DashboardScreen,
    lots: LotsScreen,
    subscribers: SubscribersScreen,
    packages: PackagesScreen,

    toasts: Vec<Toast>,
    /// Screens that have fetched at least once this session.
    visited: HashSet<ScreenId>,

    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl App {
    pub fn new(portal: Portal) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            portal,
            active: ScreenId::Dashboard,
            running: true,
            help_visible: false,
            dashboard: DashboardScreen::new(),
            lots: LotsScreen::new(),
            subscribers: SubscribersScreen::new(),
            packages: PackagesScreen::new(),
            toasts: Vec::new(),
            visited: HashSet::new(),
            outcome_tx,
            outcome_rx,
        }
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::enter()?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        // Initial load for the landing screen.
        self.activate(ScreenId::Dashboard);

        while self.running {
            tokio::select! {
                maybe_event = events.next() => {
                    let Some(event) = maybe_event else { break };
                    match event {
                        Event::Key(key) => self.handle_key(key),
                        Event::Resize => {}
                        Event::Tick => self.on_tick(),
                        Event::Render => tui.draw(|frame| self.render(frame))?,
                    }
                }
                Some(outcome) = self.outcome_rx.recv() => {
                    self.apply_outcome(outcome);
                }
            }
        }

        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Key handling ─────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) {
        if self.help_visible {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.help_visible = false;
            }
            return;
        }

        // Text-capture contexts get every key except their own exits.
        if self.active == ScreenId::Subscribers && self.subscribers.search_mode {
            let command = self.subscribers.handle_key(key);
            self.apply_command(command);
            return;
        }
        if self.active == ScreenId::Packages && self.packages.form.is_open() {
            let command = self.packages.handle_key(key, &self.portal);
            self.apply_command(command);
            return;
        }

        // Global keybindings
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => {
                self.running = false;
                return;
            }
            (KeyModifiers::NONE, KeyCode::Char('?')) => {
                self.help_visible = true;
                return;
            }
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='4')) => {
                if let Some(screen) = ScreenId::from_number(c as u8 - b'0') {
                    self.activate(screen);
                }
                return;
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                self.activate(self.active.next());
                return;
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                self.activate(self.active.prev());
                return;
            }
            _ => {}
        }

        // Delegate to the active screen.
        let command = match self.active {
            ScreenId::Dashboard => self.dashboard.handle_key(key),
            ScreenId::Lots => {
                let row_count = self.portal.store().lot_count();
                self.lots.handle_key(key, row_count)
            }
            ScreenId::Subscribers => self.subscribers.handle_key(key),
            ScreenId::Packages => self.packages.handle_key(key, &self.portal),
        };
        self.apply_command(command);
    }

    fn apply_command(&mut self, command: Option<ScreenCommand>) {
        match command {
            Some(ScreenCommand::Refresh) => self.trigger_refresh(self.active),
            Some(ScreenCommand::SubmitPackage(body)) => self.spawn_create_package(body),
            Some(ScreenCommand::Toast(message, level)) => self.push_toast(message, level),
            None => {}
        }
    }

    /// Switch screens, fetching on first activation.
    fn activate(&mut self, screen: ScreenId) {
        if screen != self.active {
            debug!("switching screen: {} -> {}", self.active, screen);
            self.active = screen;
        }
        if self.visited.insert(screen) {
            self.trigger_refresh(screen);
        }
    }

    // ── Background work ──────────────────────────────────────────────

    fn trigger_refresh(&mut self, screen: ScreenId) {
        let portal = self.portal.clone();
        let tx = self.outcome_tx.clone();

        match screen {
            ScreenId::Dashboard => {
                if self.dashboard.loading {
                    return;
                }
                self.dashboard.loading = true;
                tokio::spawn(async move {
                    let result = fetch_dashboard(&portal).await;
                    let _ = tx.send(FetchOutcome::Dashboard(result));
                });
            }
            ScreenId::Lots => {
                if self.lots.loading {
                    return;
                }
                self.lots.loading = true;
                tokio::spawn(async move {
                    let result = portal.refresh_lots().await;
                    let _ = tx.send(FetchOutcome::Lots(result));
                });
            }
            ScreenId::Subscribers => {
                if self.subscribers.loading {
                    return;
                }
                self.subscribers.loading = true;
                tokio::spawn(async move {
                    let result = portal.refresh_roster().await;
                    let _ = tx.send(FetchOutcome::Roster(result));
                });
            }
            ScreenId::Packages => {
                if self.packages.loading {
                    return;
                }
                self.packages.loading = true;
                tokio::spawn(async move {
                    // Lots feed the modal's lot selector.
                    if let Err(e) = portal.refresh_lots().await {
                        warn!(error = %e, "lot refresh for package screen failed");
                    }
                    let result = portal.refresh_packages().await;
                    let _ = tx.send(FetchOutcome::Packages(result));
                });
            }
        }
    }

    fn spawn_create_package(&mut self, body: SubscriptionPackageCreate) {
        let portal = self.portal.clone();
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = portal.create_package(&body).await;
            let _ = tx.send(FetchOutcome::PackageCreated(result));
        });
    }

    fn apply_outcome(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Dashboard(result) => {
                self.dashboard.loading = false;
                match result {
                    Ok(data) => self.dashboard.data = Some(data),
                    Err(e) => self.toast_error(&e),
                }
            }
            FetchOutcome::Lots(result) => {
                self.lots.loading = false;
                if let Err(e) = result {
                    self.toast_error(&e);
                }
            }
            FetchOutcome::Roster(result) => {
                self.subscribers.loading = false;
                match result {
                    // false = a newer refresh superseded this one.
                    Ok(_) => {}
                    Err(e) => self.toast_error(&e),
                }
            }
            FetchOutcome::Packages(result) => {
                self.packages.loading = false;
                if let Err(e) = result {
                    self.toast_error(&e);
                }
            }
            FetchOutcome::PackageCreated(result) => match result {
                Ok(pkg) => {
                    self.packages.form.submit_succeeded();
                    self.push_toast(
                        format!("Package '{}' created", pkg.name),
                        ToastLevel::Success,
                    );
                    // Parent refetches after a successful create.
                    self.trigger_refresh(ScreenId::Packages);
                }
                Err(e) => {
                    // Server message verbatim when present, else a
                    // generic fallback.
                    let message = server_message(&e);
                    self.packages.form.submit_failed(message.clone());
                    self.push_toast(message, ToastLevel::Error);
                }
            },
        }
    }

    // ── Toasts ───────────────────────────────────────────────────────

    fn push_toast(&mut self, message: String, level: ToastLevel) {
        self.toasts.push(Toast {
            message,
            level,
            expires: Instant::now() + TOAST_TTL,
        });
    }

    fn toast_error(&mut self, error: &CoreError) {
        self.push_toast(server_message(error), ToastLevel::Error);
    }

    fn on_tick(&mut self) {
        let now = Instant::now();
        self.toasts.retain(|t| t.expires > now);
        self.dashboard.on_tick();
        self.lots.on_tick();
        self.subscribers.on_tick();
        self.packages.on_tick();
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        match self.active {
            ScreenId::Dashboard => self.dashboard.render(frame, layout[0], &self.portal),
            ScreenId::Lots => self.lots.render(frame, layout[0], &self.portal),
            ScreenId::Subscribers => self.subscribers.render(frame, layout[0], &self.portal),
            ScreenId::Packages => self.packages.render(frame, layout[0], &self.portal),
        }

        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);
        self.render_toasts(frame, area);

        if self.help_visible {
            self.render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let identity = self.portal.session().map_or_else(
            || Span::styled("not logged in", Style::default().fg(theme::ERROR_RED)),
            |s| {
                Span::styled(
                    format!(
                        "{} ({})",
                        s.email,
                        match s.role {
                            Role::Partner => "partner",
                            Role::Admin => "admin",
                        }
                    ),
                    Style::default().fg(theme::SUCCESS_GREEN),
                )
            },
        );

        let hints = Span::styled(" │ r refresh  ? help  q quit", theme::key_hint());

        frame.render_widget(
            Paragraph::new(Line::from(vec![Span::raw(" "), identity, hints])),
            area,
        );
    }

    fn render_toasts(&self, frame: &mut Frame, area: Rect) {
        let width = 44u16.min(area.width.saturating_sub(2));
        let mut y = area.y + 1;

        for toast in self.toasts.iter().rev().take(3) {
            let color = match toast.level {
                ToastLevel::Success => theme::SUCCESS_GREEN,
                ToastLevel::Error => theme::ERROR_RED,
                ToastLevel::Info => theme::METER_BLUE,
            };
            let toast_area = Rect::new(area.right().saturating_sub(width + 1), y, width, 3);
            y = y.saturating_add(3);

            frame.render_widget(Clear, toast_area);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(theme::BG_DARK));
            let inner = block.inner(toast_area);
            frame.render_widget(block, toast_area);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    toast.message.clone(),
                    Style::default().fg(color),
                ))),
                inner,
            );
        }
    }

    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let width = 50u16.min(area.width.saturating_sub(4));
        let height = 16u16.min(area.height.saturating_sub(4));
        let x = (area.width.saturating_sub(width)) / 2;
        let y = (area.height.saturating_sub(height)) / 2;
        let help_area = Rect::new(area.x + x, area.y + y, width, height);

        frame.render_widget(Clear, help_area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let hint = |keys: &str, what: &str| {
            Line::from(vec![
                Span::styled(format!("  {keys:<10}"), theme::key_hint_key()),
                Span::styled(what.to_owned(), theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            hint("1-4", "Jump to screen"),
            hint("Tab", "Next screen"),
            hint("j/k ↑/↓", "Move selection"),
            hint("r", "Refresh active screen"),
            hint("/", "Search (Subscribers)"),
            hint("f", "Cycle status filter (Subscribers)"),
            hint("←/→", "Page (Subscribers) / choose (modal)"),
            hint("n", "New package (Packages)"),
            hint("Esc", "Close modal / help"),
            hint("q", "Quit"),
            Line::from(""),
            Line::from(Span::styled(
                "                    Esc or ? to close",
                theme::key_hint(),
            )),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}

/// Best user-facing message for a failed operation: the server's text
/// verbatim when it supplied one, else the error's own rendering.
fn server_message(error: &CoreError) -> String {
    match error {
        CoreError::Api { message, .. } | CoreError::Rejected { message } => message.clone(),
        other => other.to_string(),
    }
}

/// Role-appropriate dashboard aggregates: platform-wide for admins,
/// first-lot stats for partners.
async fn fetch_dashboard(portal: &Portal) -> Result<DashboardData, CoreError> {
    let to = Utc::now().date_naive();
    let from = to - chrono::Duration::days(30);

    match portal.config().role {
        Role::Admin => {
            let stats = portal.platform_stats(from, to).await?;
            Ok(DashboardData {
                revenue: stats.revenue_by_day,
                active_subscriptions: stats.active_subscriptions,
                total_lots: Some(stats.total_parking_lots),
                total_partners: Some(stats.total_partners),
                occupancy: None,
            })
        }
        Role::Partner => {
            portal.refresh_lots().await?;
            let lots = portal.store().lots_snapshot();
            let Some(first) = lots.first() else {
                return Ok(DashboardData::default());
            };
            let stats = portal.lot_stats(first.id, from, to).await?;
            Ok(DashboardData {
                revenue: stats.revenue_by_day,
                active_subscriptions: stats.active_subscriptions,
                total_lots: Some(u64::try_from(lots.len()).unwrap_or(u64::MAX)),
                total_partners: None,
                occupancy: Some(stats.occupancy_rate),
            })
        }
    }
}
