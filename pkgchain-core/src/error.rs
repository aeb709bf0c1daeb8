//! Error types and result aliases.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Manifest unreadable at {path}: {reason}")]
    ManifestUnreadable { path: PathBuf, reason: String },

    #[error("Duplicate symbolic name: {name}. Each package must appear once and declare a unique manifest name.")]
    DuplicateSymbolicName { name: String },

    #[error("Version range for {dependency} not found in manifest of {consumer}")]
    RangeNotFound { consumer: String, dependency: String },

    #[error("Invalid config file {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Config file not found searching upward from {0}. Expected 'pkgchain.toml' or 'pkgchain.json'.")]
    ConfigNotFound(PathBuf),

    #[error("Package not found: {name}. Available packages: {available}")]
    PackageNotFound { name: String, available: String },

    #[error("No packages found")]
    NoPackages,

    #[error("Command `{command}` failed in {cwd}: {message}")]
    CommandFailed {
        command: String,
        cwd: PathBuf,
        message: String,
    },

    #[error("{path}: not on {expected} branch ({branch})")]
    NotOnMainBranch {
        path: PathBuf,
        branch: String,
        expected: String,
    },

    #[error("{0}: uncommitted changes")]
    UncommittedChanges(PathBuf),

    #[error("{0}: directory is not empty")]
    DirectoryNotEmpty(PathBuf),

    #[error("No repository url published for {0}")]
    MissingRepositoryUrl(String),

    #[error("Invalid version pattern: {0}")]
    InvalidPattern(String),

    #[error("Watch error: {0}")]
    Watch(String),
}

pub type Result<T> = std::result::Result<T, Error>;
