//! Output rendering for the CLI.
//!
//! Every command funnels its results through [`emit_list`] or
//! [`emit_one`]: tables via the `Tabled` derive, JSON/YAML via serde,
//! plain mode as one identifier per line for scripting.

use std::io::{self, IsTerminal, Write};

use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Render a collection in the selected format and write it to stdout.
///
/// `to_row` shapes one item for the table view; `id_of` extracts the
/// identifier plain mode prints. Structured formats serialize the
/// original items, not the table rows.
pub fn emit_list<T, R>(
    global: &GlobalOpts,
    items: &[T],
    to_row: impl Fn(&T) -> R,
    id_of: impl Fn(&T) -> String,
) where
    T: serde::Serialize,
    R: Tabled,
{
    let rendered = match global.output {
        OutputFormat::Table => {
            let rows: Vec<R> = items.iter().map(to_row).collect();
            Table::new(&rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Plain => items.iter().map(id_of).collect::<Vec<_>>().join("\n"),
        ref structured => serialize(structured, items),
    };
    write_stdout(&rendered, global.quiet);
}

/// Render a single item in the selected format and write it to stdout.
///
/// Detail views are hand-formatted strings rather than one-row tables,
/// so the table arm takes a `describe` closure.
pub fn emit_one<T: serde::Serialize>(
    global: &GlobalOpts,
    item: &T,
    describe: impl Fn(&T) -> String,
    id_of: impl Fn(&T) -> String,
) {
    let rendered = match global.output {
        OutputFormat::Table => describe(item),
        OutputFormat::Plain => id_of(item),
        ref structured => serialize(structured, item),
    };
    write_stdout(&rendered, global.quiet);
}

fn serialize<T: serde::Serialize + ?Sized>(format: &OutputFormat, data: &T) -> String {
    match format {
        OutputFormat::JsonCompact => serde_json::to_string(data),
        OutputFormat::Yaml => return serde_yaml::to_string(data).expect("value serializes"),
        // Json; Table and Plain never reach here.
        _ => serde_json::to_string_pretty(data),
    }
    .expect("value serializes")
}

fn write_stdout(rendered: &str, quiet: bool) {
    if quiet || rendered.is_empty() {
        return;
    }
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "{rendered}");
}
