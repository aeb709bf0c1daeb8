use std::path::Path;

use anyhow::Result;
use pkgchain_core::{Invocation, Shell, SystemShell};

use crate::formatting::print_success;

use super::Session;

const DEFAULT_EDITOR: &str = "code";

/// Opens the discovered config files in `$EDITOR`.
pub fn cmd_edit(cwd: &Path) -> Result<()> {
    let session = Session::open(cwd)?;
    let editor = std::env::var("EDITOR")
        .ok()
        .filter(|editor| !editor.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string());
    let opened = session.workspace.edit(&editor)?;
    print_success(&format!("Opened {} config files with {}", opened, editor));
    Ok(())
}

pub fn cmd_ping(cwd: &Path) -> Result<()> {
    SystemShell.run(cwd, &Invocation::new("echo", ["pong"]))?;
    Ok(())
}
