//! Build, bump, push and publish chains.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::order::OrderedGraph;
use crate::workspace::Workspace;

/// Message used when no commit message is supplied.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Small fix";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BumpType {
    Major,
    Minor,
    #[default]
    Patch,
}

impl BumpType {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            BumpType::Major => "major",
            BumpType::Minor => "minor",
            BumpType::Patch => "patch",
        }
    }
}

/// Where commit messages for pending changes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitMessage {
    /// Ask the [`Reporter`](crate::Reporter) for each package.
    Prompt,
    Fixed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishSummary {
    pub committed: Vec<String>,
    pub published: Vec<String>,
}

impl PublishSummary {
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty() && self.published.is_empty()
    }
}

impl Workspace {
    /// Builds (when a `build` script exists), bumps the version, pushes the
    /// main branch and publishes the package in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOnMainBranch`] when `dir` is on another branch, or
    /// the first failing command.
    pub fn build_bump_push_publish(&self, dir: &Path, bump: BumpType) -> Result<()> {
        let git = self.git();
        git.ensure_branch(dir, &self.config.main_branch)?;

        let manifest = self.manifest(dir)?;
        if manifest.has_script("build") {
            self.reporter
                .step(&format!("Building {}", dir.display()));
            self.run(dir, &self.manager.run_script("build", &[]))?;
        }

        self.run(dir, &self.manager.version_bump(bump))?;
        git.push(dir, &self.config.main_branch)?;
        self.run(dir, &self.manager.publish())?;

        info!(package = %manifest.name, bump = bump.as_str(), "published");
        self.reporter
            .done(&format!("Published {}", dir.display()));
        Ok(())
    }

    /// Commits everything in `dir` with `message`, then publishes a patch.
    pub fn commit_build_bump_push_publish(&self, dir: &Path, message: &str) -> Result<()> {
        let git = self.git();
        git.ensure_branch(dir, &self.config.main_branch)?;
        git.commit_all(dir, message)?;
        self.build_bump_push_publish(dir, BumpType::Patch)
    }

    /// Commits pending changes in `dir`. Returns false when the tree is clean.
    pub fn commit_if_needed(&self, name: &str, dir: &Path, message: &CommitMessage) -> Result<bool> {
        let git = self.git();
        let Some(changes) = git.pending_changes(dir)? else {
            debug!(package = name, "nothing to commit");
            return Ok(false);
        };

        git.ensure_branch(dir, &self.config.main_branch)?;
        self.reporter
            .step(&format!("Committing {} in {}\n{}", name, dir.display(), changes));
        let message = match message {
            CommitMessage::Fixed(message) => message.clone(),
            CommitMessage::Prompt => self.reporter.commit_message(name, dir, &changes),
        };
        git.commit_all(dir, &message)?;
        self.reporter.done(&format!("Committed {}", name));
        Ok(true)
    }

    /// Publishes `dir` unless its last commit is the latest version tag.
    ///
    /// A repository without tags is always published.
    pub fn publish_if_needed(&self, dir: &Path) -> Result<bool> {
        let git = self.git();
        let last_message = git.last_commit_message(dir)?;
        if let Some(tag) = git.latest_tag(dir) {
            if tag == last_message {
                self.reporter
                    .note(&format!("{} is already published at {}", dir.display(), tag));
                return Ok(false);
            }
        }
        self.reporter
            .step(&format!("Publishing {}", dir.display()));
        self.build_bump_push_publish(dir, BumpType::Patch)?;
        Ok(true)
    }

    fn refresh_if_stale(&self, name: &str, dir: &Path, graph: &OrderedGraph) -> Result<bool> {
        let manifest = self.manifest(dir)?;
        let report = self.check_manifest(&manifest, graph, false)?;
        if report.all_actual {
            return Ok(false);
        }
        self.reporter.step(&format!(
            "Refreshing {}: {}",
            name,
            report.stale_names.join(", ")
        ));
        self.install_latest(dir)?;
        self.link(dir)?;
        Ok(true)
    }

    /// Walks every ordered package, providers first: refreshes stale
    /// dependencies, commits pending changes and publishes what changed.
    ///
    /// Later packages see the versions published earlier in the same run.
    pub fn publish_recursive(&self, message: &CommitMessage) -> Result<PublishSummary> {
        let graph = self.ordered_graph()?;
        if graph.is_empty() {
            return Err(Error::NoPackages);
        }

        let mut summary = PublishSummary::default();
        for node in &graph {
            let name = node.symbolic_name.as_str();
            let dir = node.location.as_path();
            self.reporter
                .step(&format!("Processing {} ({})", name, dir.display()));

            self.refresh_if_stale(name, dir, &graph)?;
            if self.commit_if_needed(name, dir, message)? {
                summary.committed.push(name.to_string());
            }
            if self.publish_if_needed(dir)? {
                summary.published.push(name.to_string());
            }
        }

        if summary.is_empty() {
            self.reporter.done(&format!(
                "Nothing to commit or publish in {}",
                self.root.display()
            ));
        }
        Ok(summary)
    }
}
