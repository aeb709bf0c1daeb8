use std::path::Path;

use anyhow::Result;
use pkgchain_core::SyncAction;

use crate::formatting::{print_section_header, print_summary_box};

use super::Session;

pub fn cmd_sync(cwd: &Path) -> Result<()> {
    let session = Session::open(cwd)?;
    print_section_header("Sync");

    let actions = session.workspace.pull_or_clone_recursive()?;
    let pulled = actions
        .iter()
        .filter(|(_, action)| *action == SyncAction::Pulled)
        .count();

    println!();
    print_summary_box(
        "Sync",
        &[
            ("Pulled", pulled.to_string()),
            ("Cloned", (actions.len() - pulled).to_string()),
        ],
    );
    Ok(())
}
