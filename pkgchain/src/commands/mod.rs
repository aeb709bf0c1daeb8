//! Command implementations for the CLI.

mod graph;
mod link;
mod misc;
mod release;
mod scripts;
mod sync;
mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use pkgchain_adapters::{get_package_manager, PackageJsonReader};
use pkgchain_core::{Config, SystemShell, Workspace};
use tracing::debug;

use crate::reporter::{CliReporter, MemoryLog};

pub use graph::{cmd_check, cmd_order};
pub use link::{cmd_fix_link, cmd_install_latest, cmd_link, cmd_link_recursive, cmd_unlink};
pub use misc::{cmd_edit, cmd_ping};
pub use release::{cmd_commit_publish, cmd_publish, cmd_publish_all};
pub use scripts::cmd_run_recursive;
pub use sync::cmd_sync;
pub use watch::cmd_watch;

/// A workspace for one command plus the log its reporter writes to.
struct Session {
    workspace: Workspace,
    log: Arc<MemoryLog>,
}

impl Session {
    fn open(cwd: &Path) -> Result<Self> {
        let config = Config::discover(cwd)
            .with_context(|| format!("loading config for {}", cwd.display()))?;
        debug!(
            sources = ?config.sources,
            manager = config.package_manager.as_str(),
            "config loaded"
        );
        let manager = get_package_manager(config.package_manager);
        let log = Arc::new(MemoryLog::default());
        let workspace = Workspace::new(
            cwd,
            config,
            PackageJsonReader,
            manager,
            SystemShell,
            CliReporter::new(Arc::clone(&log)),
        );
        Ok(Self { workspace, log })
    }

    fn finish(&self) {
        self.log.flush();
    }
}

pub fn resolve_cwd(cwd: Option<PathBuf>) -> Result<PathBuf> {
    let cwd = match cwd {
        Some(path) => path,
        None => std::env::current_dir().context("reading current directory")?,
    };
    let cwd = cwd
        .canonicalize()
        .with_context(|| format!("{} is not accessible", cwd.display()))?;
    Ok(cwd)
}
