//! Process execution seam.

use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{Error, Result};

/// A program with its arguments, never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Runs invocations in a working directory.
pub trait Shell: Send + Sync {
    /// Runs quietly and returns stdout. Non-zero exit is an error.
    fn capture(&self, cwd: &Path, invocation: &Invocation) -> Result<String>;

    /// Runs with inherited stdio. Non-zero exit is an error.
    fn run(&self, cwd: &Path, invocation: &Invocation) -> Result<()>;
}

/// [`Shell`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShell;

impl SystemShell {
    fn command(cwd: &Path, invocation: &Invocation) -> Command {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).current_dir(cwd);
        command
    }

    fn failed(cwd: &Path, invocation: &Invocation, message: impl Into<String>) -> Error {
        Error::CommandFailed {
            command: invocation.to_string(),
            cwd: cwd.to_path_buf(),
            message: message.into(),
        }
    }
}

impl Shell for SystemShell {
    fn capture(&self, cwd: &Path, invocation: &Invocation) -> Result<String> {
        debug!(cwd = %cwd.display(), command = %invocation, "capture");
        let output = Self::command(cwd, invocation)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Self::failed(cwd, invocation, format!("Failed to spawn: {}", e)))?;

        if !output.status.success() {
            return Err(Self::failed(
                cwd,
                invocation,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run(&self, cwd: &Path, invocation: &Invocation) -> Result<()> {
        info!(cwd = %cwd.display(), command = %invocation, "run");
        let status = Self::command(cwd, invocation)
            .status()
            .map_err(|e| Self::failed(cwd, invocation, format!("Failed to spawn: {}", e)))?;

        if !status.success() {
            let message = match status.code() {
                Some(code) => format!("exited with status {}", code),
                None => "terminated by signal".to_string(),
            };
            return Err(Self::failed(cwd, invocation, message));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let invocation = Invocation::new("git", ["commit", "-m", "Small fix"]);
        assert_eq!(invocation.to_string(), "git commit -m \"Small fix\"");
    }

    #[cfg(unix)]
    #[test]
    fn run_reports_exit_status() {
        let cwd = std::env::temp_dir();
        assert!(SystemShell.run(&cwd, &Invocation::new("sh", ["-c", "exit 0"])).is_ok());

        match SystemShell.run(&cwd, &Invocation::new("sh", ["-c", "exit 4"])) {
            Err(Error::CommandFailed { message, .. }) => assert_eq!(message, "exited with status 4"),
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }
}
