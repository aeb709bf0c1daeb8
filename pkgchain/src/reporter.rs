//! Terminal [`Reporter`] with a memory log of finished steps.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use owo_colors::OwoColorize;
use pkgchain_core::release::DEFAULT_COMMIT_MESSAGE;
use pkgchain_core::Reporter;

use crate::formatting::{print_info, print_success, print_warning, Status};

/// Collects "done" messages so long runs can end with a summary.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn push(&self, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Prints and clears everything logged so far.
    pub fn flush(&self) {
        let entries = self.take();
        if entries.is_empty() {
            return;
        }
        println!();
        println!("{}", "[Summary]".cyan().bold());
        for entry in entries {
            println!("  {}", Status::Success.format(&entry));
        }
        println!();
    }
}

pub struct CliReporter {
    log: Arc<MemoryLog>,
}

impl CliReporter {
    pub fn new(log: Arc<MemoryLog>) -> Self {
        Self { log }
    }
}

impl Reporter for CliReporter {
    fn step(&self, message: &str) {
        println!();
        print_info(message);
    }

    fn note(&self, message: &str) {
        print_warning(message);
    }

    fn done(&self, message: &str) {
        print_success(message);
        self.log.push(message);
    }

    fn commit_message(&self, package: &str, path: &Path, _changes: &str) -> String {
        print!(
            "  {} ({}) [{}]: ",
            format!("Commit message for {}", package).bold(),
            path.display().bright_black(),
            DEFAULT_COMMIT_MESSAGE
        );
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) if !line.trim().is_empty() => line.trim().to_string(),
            _ => DEFAULT_COMMIT_MESSAGE.to_string(),
        }
    }
}
