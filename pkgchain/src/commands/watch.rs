//! Watch mode command.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::{AnsiColors, OwoColorize};
use pkgchain_core::WatchRunner;

use crate::formatting::{print_key_value, print_section_header, print_warning};

use super::Session;

const PREFIX_COLORS: [AnsiColors; 6] = [
    AnsiColors::Cyan,
    AnsiColors::Magenta,
    AnsiColors::Green,
    AnsiColors::Yellow,
    AnsiColors::Blue,
    AnsiColors::Red,
];

pub fn cmd_watch(cwd: &Path) -> Result<()> {
    let session = Session::open(cwd)?;
    let targets = session.workspace.watch_targets()?;

    print_section_header("Watch Mode");
    let names: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
    print_key_value("Watching", &names.join(", "));
    println!("  Press Ctrl+C to stop");
    println!();

    let width = names.iter().map(|name| name.len()).max().unwrap_or(0);
    let prefixes: HashMap<String, String> = targets
        .iter()
        .enumerate()
        .map(|(idx, target)| {
            let label = format!("[{:width$}]", target.name, width = width);
            let color = PREFIX_COLORS[idx % PREFIX_COLORS.len()];
            (target.name.clone(), label.color(color).to_string())
        })
        .collect();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    let result = runtime.block_on(WatchRunner::new(targets).run(move |name, line, stderr| {
        let prefix = prefixes.get(name).map(String::as_str).unwrap_or(name);
        if stderr {
            eprintln!("{} {}", prefix, line);
        } else {
            println!("{} {}", prefix, line);
        }
    }));

    println!();
    print_warning("Stopped watch mode");
    result?;
    Ok(())
}
