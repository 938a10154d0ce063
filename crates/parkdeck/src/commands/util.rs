//! Shared helpers for command handlers.

use std::path::Path;

use chrono::NaiveDate;
use owo_colors::OwoColorize;

use crate::cli::{GlobalOpts, ListArgs, SortDirArg};
use crate::error::CliError;
use crate::output;
use parkdeck_core::{PageRequest, SortDir};

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Parse a `YYYY-MM-DD` CLI argument.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.to_owned(),
        reason: format!("expected YYYY-MM-DD, got '{value}'"),
    })
}

/// Translate shared list flags into a wire page request.
pub fn page_request(list: &ListArgs) -> PageRequest {
    PageRequest {
        page: list.page,
        size: list.limit,
        sort_dir: match list.sort {
            SortDirArg::Asc => SortDir::Asc,
            SortDirArg::Desc => SortDir::Desc,
        },
    }
}

/// Print a success line to stderr (green when color is enabled),
/// respecting quiet mode.
pub fn success(message: &str, global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    if output::should_color(&global.color) {
        eprintln!("{} {message}", "✓".green());
    } else {
        eprintln!("{message}");
    }
}
