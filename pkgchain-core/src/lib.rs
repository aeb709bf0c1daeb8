//! Core library for ordering, checking and releasing chains of local packages.

pub mod actuality;
pub mod adapter;
pub mod config;
pub mod error;
pub mod git;
pub mod graph;
pub mod manifest;
pub mod order;
pub mod release;
pub mod reporter;
pub mod selection;
pub mod shell;
pub mod sync;
pub mod watch;
pub mod workspace;

pub use actuality::{accepts_range, check_actuality, is_actual, ActualityReport, DependencyState};
pub use adapter::{ManifestReader, PackageManager};
pub use config::{Config, PackageManagerKind};
pub use error::{Error, Result};
pub use graph::{build_nodes, depends_on, provides_for, DependencyGraph, PackageFilter, PackageNode};
pub use manifest::{DependencyKind, Exemptions, ManifestSnapshot};
pub use order::{build_ordered_graph, OrderedGraph};
pub use release::{BumpType, CommitMessage, PublishSummary};
pub use reporter::Reporter;
pub use selection::SuitablePackages;
pub use shell::{Invocation, Shell, SystemShell};
pub use sync::SyncAction;
pub use watch::{LineSink, WatchRunner, WatchTarget};
pub use workspace::{manifest_dirs, Workspace};
