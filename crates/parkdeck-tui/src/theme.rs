//! Deep-asphalt palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

use parkdeck_core::{LotStatus, SubscriptionStatus};

// ── Core Palette ──────────────────────────────────────────────────────

pub const SIGNAL_AMBER: Color = Color::Rgb(255, 183, 77); // #ffb74d
pub const LANE_TEAL: Color = Color::Rgb(77, 208, 225); // #4dd0e1
pub const METER_BLUE: Color = Color::Rgb(100, 181, 246); // #64b5f6
pub const SUCCESS_GREEN: Color = Color::Rgb(129, 199, 132); // #81c784
pub const ERROR_RED: Color = Color::Rgb(229, 115, 115); // #e57373
pub const WARN_YELLOW: Color = Color::Rgb(255, 241, 118); // #fff176

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(197, 200, 208); // #c5c8d0
pub const BORDER_GRAY: Color = Color::Rgb(84, 96, 120); // #546078
pub const BG_HIGHLIGHT: Color = Color::Rgb(38, 42, 52); // #262a34
pub const BG_DARK: Color = Color::Rgb(24, 26, 33); // #181a21

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(LANE_TEAL).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(SIGNAL_AMBER)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(LANE_TEAL)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(SIGNAL_AMBER)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Active tab in the tab bar.
pub fn tab_active() -> Style {
    Style::default().fg(SIGNAL_AMBER).add_modifier(Modifier::BOLD)
}

/// Inactive tab in the tab bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(LANE_TEAL).add_modifier(Modifier::BOLD)
}

// ── Status badges ─────────────────────────────────────────────────────

/// Badge color for a lot's lifecycle status.
pub fn lot_status_color(status: LotStatus) -> Color {
    match status {
        LotStatus::Active => SUCCESS_GREEN,
        LotStatus::Pending
        | LotStatus::Preparing
        | LotStatus::PartnerConfiguration
        | LotStatus::PendingPayment => WARN_YELLOW,
        LotStatus::Inactive | LotStatus::Unknown => DIM_WHITE,
        LotStatus::MapDenied | LotStatus::Rejected => ERROR_RED,
    }
}

/// Badge color for a subscription's status.
pub fn subscription_status_color(status: SubscriptionStatus) -> Color {
    match status {
        SubscriptionStatus::Active => SUCCESS_GREEN,
        SubscriptionStatus::PendingPayment => WARN_YELLOW,
        SubscriptionStatus::Expired | SubscriptionStatus::Cancelled => ERROR_RED,
        SubscriptionStatus::Inactive | SubscriptionStatus::Unknown => DIM_WHITE,
    }
}
