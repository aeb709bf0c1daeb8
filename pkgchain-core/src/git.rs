//! Git queries and commands run through a [`Shell`].

use std::path::Path;

use crate::error::{Error, Result};
use crate::shell::{Invocation, Shell};

pub struct Git<'a> {
    shell: &'a dyn Shell,
}

fn git<I, S>(args: I) -> Invocation
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Invocation::new("git", args)
}

impl<'a> Git<'a> {
    pub fn new(shell: &'a dyn Shell) -> Self {
        Self { shell }
    }

    pub fn is_repo(&self, dir: &Path) -> bool {
        self.shell
            .capture(dir, &git(["status", "--porcelain"]))
            .is_ok()
    }

    /// Porcelain status when the working tree has changes.
    pub fn pending_changes(&self, dir: &Path) -> Result<Option<String>> {
        let status = self.shell.capture(dir, &git(["status", "--porcelain"]))?;
        let status = status.trim();
        Ok((!status.is_empty()).then(|| status.to_string()))
    }

    pub fn current_branch(&self, dir: &Path) -> Result<String> {
        let branch = self
            .shell
            .capture(dir, &git(["branch", "--show-current"]))?;
        Ok(branch.trim().to_string())
    }

    pub fn ensure_branch(&self, dir: &Path, expected: &str) -> Result<()> {
        let branch = self.current_branch(dir)?;
        if branch != expected {
            return Err(Error::NotOnMainBranch {
                path: dir.to_path_buf(),
                branch,
                expected: expected.to_string(),
            });
        }
        Ok(())
    }

    pub fn last_commit_message(&self, dir: &Path) -> Result<String> {
        let message = self
            .shell
            .capture(dir, &git(["log", "-1", "--pretty=%B"]))?;
        Ok(message.trim().to_string())
    }

    /// Most recent tag without a leading `v`; `None` when there is no tag.
    pub fn latest_tag(&self, dir: &Path) -> Option<String> {
        self.shell
            .capture(dir, &git(["describe", "--tags", "--abbrev=0"]))
            .ok()
            .map(|tag| tag.trim().trim_start_matches('v').to_string())
            .filter(|tag| !tag.is_empty())
    }

    pub fn commit_all(&self, dir: &Path, message: &str) -> Result<()> {
        self.shell.run(dir, &git(["add", "-A"]))?;
        self.shell.run(dir, &git(["commit", "-m", message]))
    }

    pub fn push(&self, dir: &Path, branch: &str) -> Result<()> {
        self.shell.run(dir, &git(["push", "origin", branch]))
    }

    pub fn pull(&self, dir: &Path, branch: &str) -> Result<()> {
        self.shell.run(dir, &git(["pull", "origin", branch]))
    }

    pub fn clone_into(&self, dir: &Path, url: &str) -> Result<()> {
        self.shell.run(dir, &git(["clone", url, "."]))
    }
}
