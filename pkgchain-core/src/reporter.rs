//! Trait for reporting workflow progress.

use std::path::Path;

/// Receives user-facing workflow messages so the core never writes to the
/// terminal directly.
pub trait Reporter: Send + Sync {
    /// A step is starting.
    fn step(&self, message: &str);

    /// Informational note that needs no action.
    fn note(&self, message: &str);

    /// A step finished. Implementations may keep these for a final summary.
    fn done(&self, message: &str);

    /// Asks for a commit message for pending `changes` in `path`.
    fn commit_message(&self, package: &str, path: &Path, changes: &str) -> String {
        let _ = (package, path, changes);
        crate::release::DEFAULT_COMMIT_MESSAGE.to_string()
    }
}

/// Reporter that drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn step(&self, _message: &str) {}
    fn note(&self, _message: &str) {}
    fn done(&self, _message: &str) {}
}
