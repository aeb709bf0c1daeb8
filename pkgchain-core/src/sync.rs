//! Keeping local package checkouts and peer links in shape.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::workspace::{manifest_dirs, Workspace};

/// What [`Workspace::pull_or_clone`] did for one package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Pulled,
    Cloned,
}

/// Turns a registry repository url into something `git clone` accepts.
pub fn normalize_repository_url(raw: &str) -> Option<String> {
    let url = raw.trim();
    let url = url.strip_prefix("git+").unwrap_or(url);
    (!url.is_empty()).then(|| url.to_string())
}

fn is_empty_dir(dir: &Path) -> Result<bool> {
    match fs::read_dir(dir) {
        Ok(mut entries) => Ok(entries.next().is_none()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
        Err(e) => Err(e.into()),
    }
}

impl Workspace {
    /// Pulls `dir` when it is a git checkout, otherwise clones the package's
    /// registered repository into it.
    ///
    /// # Errors
    ///
    /// [`Error::UncommittedChanges`] before pulling a dirty tree,
    /// [`Error::DirectoryNotEmpty`] before cloning over existing files, and
    /// [`Error::MissingRepositoryUrl`] when the registry knows no repository.
    pub fn pull_or_clone(&self, name: &str, dir: &Path) -> Result<SyncAction> {
        let git = self.git();
        if dir.is_dir() && git.is_repo(dir) {
            if git.pending_changes(dir)?.is_some() {
                return Err(Error::UncommittedChanges(dir.to_path_buf()));
            }
            git.pull(dir, &self.config.main_branch)?;
            return Ok(SyncAction::Pulled);
        }

        if !is_empty_dir(dir)? {
            return Err(Error::DirectoryNotEmpty(dir.to_path_buf()));
        }
        fs::create_dir_all(dir)?;

        let raw = self
            .shell
            .capture(dir, &self.manager.view_repository_url(name))?;
        let url = normalize_repository_url(&raw)
            .ok_or_else(|| Error::MissingRepositoryUrl(name.to_string()))?;
        debug!(package = name, %url, "cloning");
        git.clone_into(dir, &url)?;
        Ok(SyncAction::Cloned)
    }

    /// [`Self::pull_or_clone`] for every configured item.
    pub fn pull_or_clone_recursive(&self) -> Result<Vec<(String, SyncAction)>> {
        if self.config.items.is_empty() {
            return Err(Error::NoPackages);
        }
        let mut actions = Vec::with_capacity(self.config.items.len());
        for (name, dir) in &self.config.items {
            self.reporter
                .step(&format!("Syncing {} ({})", name, dir.display()));
            let action = self.pull_or_clone(name, dir)?;
            let verb = match action {
                SyncAction::Pulled => "Pulled",
                SyncAction::Cloned => "Cloned",
            };
            self.reporter.done(&format!("{} {}", verb, name));
            actions.push((name.clone(), action));
        }
        Ok(actions)
    }

    fn installed_path(&self, dir: &Path, package: &str) -> Option<PathBuf> {
        let output = self
            .shell
            .capture(dir, &self.manager.list_package(package))
            .ok()?;
        self.manager.parse_listed_path(&output, package)
    }

    /// Points each suitable package's copy of its peer dependencies at the
    /// project's copy, so both resolve the same instance.
    ///
    /// Returns the number of links replaced.
    pub fn fix_link(&self, project_dir: &Path) -> Result<usize> {
        let project = self.manifest(project_dir)?;
        let suitable = self.suitable(&project);
        let mut fixed = 0;

        for name in &suitable.all {
            let location = self.config.location_of(name)?;
            let library = self.manifest(location)?;
            for peer in library.peer.keys() {
                let from = self.installed_path(location, peer);
                let to = self.installed_path(project_dir, peer);
                let (Some(from), Some(to)) = (from, to) else {
                    self.reporter
                        .note(&format!("{}: {} is not installed on both sides", name, peer));
                    continue;
                };
                if replace_with_symlink(&from, &to)? {
                    self.reporter
                        .done(&format!("Linked {} of {} to {}", peer, name, to.display()));
                    fixed += 1;
                } else {
                    self.reporter
                        .note(&format!("Skipped {} of {}: symlinks unsupported", peer, name));
                }
            }
        }
        Ok(fixed)
    }

    /// [`Self::fix_link`] for every manifest below `root`.
    pub fn fix_link_recursive(&self, root: &Path) -> Result<usize> {
        let mut fixed = 0;
        for dir in manifest_dirs(root, self.reader.manifest_file()) {
            fixed += self.fix_link(&dir)?;
        }
        Ok(fixed)
    }
}

/// Replaces whatever sits at `link` with a symlink to `target`.
#[cfg(unix)]
pub fn replace_with_symlink(link: &Path, target: &Path) -> Result<bool> {
    match fs::symlink_metadata(link) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(link)?,
        Ok(_) => fs::remove_file(link)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent)?;
    }
    std::os::unix::fs::symlink(target, link)?;
    Ok(true)
}

#[cfg(not(unix))]
pub fn replace_with_symlink(link: &Path, _target: &Path) -> Result<bool> {
    tracing::warn!(path = %link.display(), "symlinks are only created on unix");
    Ok(false)
}
