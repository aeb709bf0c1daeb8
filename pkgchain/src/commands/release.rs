//! Publishing commands.

use std::path::Path;

use anyhow::Result;
use pkgchain_core::release::{BumpType, CommitMessage, DEFAULT_COMMIT_MESSAGE};

use crate::formatting::{print_section_header, print_summary_box, print_success};

use super::Session;

pub fn cmd_publish(cwd: &Path, bump: BumpType) -> Result<()> {
    let session = Session::open(cwd)?;
    session.workspace.build_bump_push_publish(cwd, bump)?;
    Ok(())
}

pub fn cmd_commit_publish(cwd: &Path, message: Option<String>) -> Result<()> {
    let session = Session::open(cwd)?;
    let message = message.unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE.to_string());
    session
        .workspace
        .commit_build_bump_push_publish(cwd, &message)?;
    Ok(())
}

pub fn cmd_publish_all(cwd: &Path, small_fix: bool) -> Result<()> {
    let session = Session::open(cwd)?;
    let message = if small_fix {
        CommitMessage::Fixed(DEFAULT_COMMIT_MESSAGE.to_string())
    } else {
        CommitMessage::Prompt
    };

    print_section_header("Publish All");
    let summary = session.workspace.publish_recursive(&message)?;
    session.finish();

    if summary.is_empty() {
        print_success("Everything is already published");
    } else {
        print_summary_box(
            "Publish All",
            &[
                ("Committed", join_or_none(&summary.committed)),
                ("Published", join_or_none(&summary.published)),
            ],
        );
    }
    Ok(())
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}
