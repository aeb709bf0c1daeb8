//! Linking and installing configured packages into projects.

use std::path::Path;

use anyhow::Result;

use crate::formatting::{print_section_header, print_success};

use super::Session;

pub fn cmd_link(cwd: &Path) -> Result<()> {
    let session = Session::open(cwd)?;
    session.workspace.link(cwd)?;
    Ok(())
}

pub fn cmd_unlink(cwd: &Path) -> Result<()> {
    let session = Session::open(cwd)?;
    session.workspace.unlink(cwd)?;
    Ok(())
}

pub fn cmd_link_recursive(cwd: &Path) -> Result<()> {
    let session = Session::open(cwd)?;
    print_section_header("Link Recursive");
    session.workspace.link_recursive()?;
    session.finish();
    Ok(())
}

pub fn cmd_install_latest(cwd: &Path, link: bool, recursive: bool) -> Result<()> {
    let session = Session::open(cwd)?;
    let workspace = &session.workspace;

    if !recursive {
        if workspace.install_latest(cwd)? && link {
            workspace.link(cwd)?;
        }
        return Ok(());
    }

    print_section_header("Install Latest");
    let installed = workspace.install_latest_recursive(cwd, link)?;
    session.finish();
    print_success(&format!("Updated {} projects", installed));
    Ok(())
}

pub fn cmd_fix_link(cwd: &Path, recursive: bool) -> Result<()> {
    let session = Session::open(cwd)?;
    let fixed = if recursive {
        session.workspace.fix_link_recursive(cwd)?
    } else {
        session.workspace.fix_link(cwd)?
    };
    session.finish();
    print_success(&format!("Fixed {} peer links", fixed));
    Ok(())
}
