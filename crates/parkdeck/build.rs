use std::fs;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::Shell;

// cli.rs only depends on clap + clap_complete (both listed as
// build-dependencies), so it can be compiled into the build script
// without dragging in the rest of the crate.
#[path = "src/cli.rs"]
mod cli;

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir: PathBuf = std::env::var_os("OUT_DIR")
        .expect("OUT_DIR not set by Cargo")
        .into();

    let cmd = cli::Cli::command();
    write_man_pages(&cmd, &out_dir.join("man"));
    write_completions(&out_dir.join("completions"));
}

/// Render one man page per command, walking the subcommand tree.
fn write_man_pages(root: &clap::Command, dir: &Path) {
    fs::create_dir_all(dir).expect("failed to create man output directory");

    let mut pending = vec![(root.get_name().to_owned(), root.clone())];
    while let Some((name, cmd)) = pending.pop() {
        let mut page = Vec::new();
        clap_mangen::Man::new(cmd.clone().name(name.clone()))
            .render(&mut page)
            .unwrap_or_else(|e| panic!("failed to render man page for `{name}`: {e}"));
        let path = dir.join(format!("{name}.1"));
        fs::write(&path, page).unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));

        for sub in cmd.get_subcommands().filter(|s| !s.is_hide_set()) {
            pending.push((format!("{name}-{}", sub.get_name()), sub.clone()));
        }
    }
}

/// Pre-generate completion scripts for the common shells; the
/// `completions` subcommand covers the rest at runtime.
fn write_completions(dir: &Path) {
    fs::create_dir_all(dir).expect("failed to create completions output directory");

    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
        let mut cmd = cli::Cli::command();
        clap_complete::generate_to(shell, &mut cmd, "parkdeck", dir)
            .unwrap_or_else(|e| panic!("failed to generate {shell} completions: {e}"));
    }
}
