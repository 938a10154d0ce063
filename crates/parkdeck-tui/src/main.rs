//! `parkdeck-tui` — Terminal dashboard for the ParkDeck back office.
//!
//! Built on [ratatui](https://ratatui.rs) over the reactive data layer
//! in `parkdeck-core`. Screens are navigable via number keys (1-4):
//! Dashboard, Lots, Subscribers, and Packages.
//!
//! Logs are written to a file (default `/tmp/parkdeck-tui.log`) to avoid
//! corrupting the terminal UI. Every data fetch is triggered by a
//! discrete event -- screen activation, the refresh key, a modal submit
//! -- never by a background poll.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and
//! app launch.

mod app;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use parkdeck_config::session::SessionStore;
use parkdeck_core::{Portal, TokenSource};

use crate::app::App;

/// Terminal dashboard for the ParkDeck parking platform.
#[derive(Parser, Debug)]
#[command(name = "parkdeck-tui", version, about)]
struct Cli {
    /// Gateway profile to use
    #[arg(short = 'p', long, default_value = "default", env = "PARKDECK_PROFILE")]
    profile: String,

    /// Platform gateway URL (overrides profile)
    #[arg(long, env = "PARKDECK_API_URL")]
    api_url: Option<String>,

    /// Log file path
    #[arg(long, default_value = "/tmp/parkdeck-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "parkdeck_tui={log_level},parkdeck_core={log_level},parkdeck_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("parkdeck-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Build a [`Portal`] from the profile config, restoring the persisted
/// session saved by `parkdeck auth login`.
fn build_portal(cli: &Cli) -> Result<Portal> {
    let cfg = parkdeck_config::load_config_or_default();
    let profile = cfg
        .profiles
        .get(&cli.profile)
        .ok_or_else(|| eyre!("profile '{}' not found -- run: parkdeck config init", cli.profile))?;

    let mut portal_config = parkdeck_config::profile_to_portal_config(profile)?;
    if let Some(ref url) = cli.api_url {
        portal_config.url = url.parse().map_err(|_| eyre!("invalid URL: {url}"))?;
    }

    let store = SessionStore::for_profile(&cli.profile);
    let tokens = store
        .load_tokens()
        .ok_or_else(|| eyre!("no session for profile '{}' -- run: parkdeck auth login", cli.profile))?;
    let stored = store
        .load()
        .ok_or_else(|| eyre!("no session for profile '{}' -- run: parkdeck auth login", cli.profile))?;

    let portal = Portal::with_tokens(portal_config, TokenSource::with_tokens(tokens.clone()))?;
    portal.restore_session(stored.to_active()?, tokens);
    Ok(portal)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    info!(profile = %cli.profile, "starting parkdeck-tui");

    let portal = build_portal(&cli)?;
    let mut app = App::new(portal);
    app.run().await?;

    Ok(())
}
