//! Concurrent `watch` scripts with prefixed output.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::shell::Invocation;

/// One long-running process to supervise.
#[derive(Debug, Clone)]
pub struct WatchTarget {
    pub name: String,
    pub dir: PathBuf,
    pub invocation: Invocation,
}

/// A line of child output: target name, text, and whether it came from stderr.
pub type LineSink = dyn Fn(&str, &str, bool) + Send + Sync;

enum Exit {
    Status(bool),
    Stopped,
    Failed(String),
}

/// Runs every target at once. The first target to fail stops all others,
/// and Ctrl-C stops everything.
pub struct WatchRunner {
    targets: Vec<WatchTarget>,
}

fn forward<R>(name: String, stream: R, stderr: bool, sink: Arc<LineSink>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            sink(&name, &line, stderr);
        }
    });
}

impl WatchRunner {
    pub fn new(targets: Vec<WatchTarget>) -> Self {
        Self { targets }
    }

    pub fn targets(&self) -> &[WatchTarget] {
        &self.targets
    }

    /// Spawns every target and waits until all have exited.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Watch`] when a target fails to start or exits
    /// unsuccessfully.
    pub async fn run<F>(self, on_line: F) -> Result<()>
    where
        F: Fn(&str, &str, bool) + Send + Sync + 'static,
    {
        let sink: Arc<LineSink> = Arc::new(on_line);
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut tasks = JoinSet::new();

        for target in self.targets {
            let mut child = Command::new(&target.invocation.program)
                .args(&target.invocation.args)
                .current_dir(&target.dir)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
                .map_err(|e| {
                    Error::Watch(format!(
                        "failed to start `{}` for {}: {}",
                        target.invocation, target.name, e
                    ))
                })?;

            if let Some(stdout) = child.stdout.take() {
                forward(target.name.clone(), stdout, false, Arc::clone(&sink));
            }
            if let Some(stderr) = child.stderr.take() {
                forward(target.name.clone(), stderr, true, Arc::clone(&sink));
            }

            let name = target.name;
            let mut stop = stop_rx.clone();
            tasks.spawn(async move {
                let waited = tokio::select! {
                    status = child.wait() => Some(status),
                    _ = stop.changed() => None,
                };
                let exit = match waited {
                    Some(Ok(status)) => Exit::Status(status.success()),
                    Some(Err(e)) => Exit::Failed(e.to_string()),
                    None => {
                        let _ = child.kill().await;
                        Exit::Stopped
                    }
                };
                (name, exit)
            });
        }

        let mut failure = None;
        let mut stopping = false;
        loop {
            tokio::select! {
                joined = tasks.join_next() => {
                    let Some(joined) = joined else { break };
                    let message = match joined {
                        Ok((name, Exit::Status(true))) => {
                            debug!(watcher = %name, "watch exited");
                            continue;
                        }
                        Ok((name, Exit::Stopped)) => {
                            debug!(watcher = %name, "watch stopped");
                            continue;
                        }
                        Ok((name, Exit::Status(false))) => format!("{} exited with failure", name),
                        Ok((name, Exit::Failed(e))) => format!("{}: {}", name, e),
                        Err(e) => e.to_string(),
                    };
                    if !stopping {
                        warn!(%message, "stopping remaining watchers");
                        failure = Some(message);
                        stopping = true;
                        let _ = stop_tx.send(true);
                    }
                }
                _ = tokio::signal::ctrl_c(), if !stopping => {
                    debug!("interrupted");
                    stopping = true;
                    let _ = stop_tx.send(true);
                }
            }
        }

        match failure {
            Some(message) => Err(Error::Watch(message)),
            None => Ok(()),
        }
    }
}
