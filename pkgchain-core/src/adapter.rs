//! Traits for reading manifests and building package manager commands.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::manifest::{DependencyKind, ManifestSnapshot};
use crate::release::BumpType;
use crate::shell::Invocation;

/// Reads a package manifest from a package root.
pub trait ManifestReader: Send + Sync {
    /// File name of the manifest inside a package root.
    fn manifest_file(&self) -> &'static str;

    fn detect(&self, path: &Path) -> bool {
        path.join(self.manifest_file()).is_file()
    }

    /// Fails with [`crate::Error::ManifestUnreadable`] when the manifest is
    /// missing or cannot be parsed.
    fn read_manifest(&self, path: &Path) -> Result<ManifestSnapshot>;
}

/// Builds the commands a package manager needs for each workflow step.
///
/// Adapters only describe commands; running them is left to a [`crate::Shell`].
pub trait PackageManager: Send + Sync {
    fn name(&self) -> &'static str;
    fn link_global(&self, packages: &[String]) -> Invocation;
    fn unlink_global(&self, packages: &[String]) -> Invocation;
    fn install_latest(&self, packages: &[String], kind: DependencyKind) -> Invocation;
    fn run_script(&self, script: &str, args: &[String]) -> Invocation;
    fn version_bump(&self, bump: BumpType) -> Invocation;
    fn publish(&self) -> Invocation;
    /// Lists where `package` is installed, as JSON.
    fn list_package(&self, package: &str) -> Invocation;
    /// Prints the repository url published for `package`.
    fn view_repository_url(&self, package: &str) -> Invocation;

    /// Extracts the install path of `package` from the output of [`Self::list_package`].
    fn parse_listed_path(&self, output: &str, package: &str) -> Option<PathBuf> {
        parse_listed_path(output, package)
    }
}

/// Reads `[0].devDependencies[pkg].path`, falling back to `dependencies`.
///
/// Accepts both a top-level array (pnpm) and a single object (npm).
pub fn parse_listed_path(output: &str, package: &str) -> Option<PathBuf> {
    let json: serde_json::Value = serde_json::from_str(output).ok()?;
    let root = match &json {
        serde_json::Value::Array(items) => items.first()?,
        other => other,
    };
    ["devDependencies", "dependencies"]
        .iter()
        .filter_map(|section| root.get(section)?.get(package)?.get("path")?.as_str())
        .map(PathBuf::from)
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listed_path_prefers_dev_dependencies() {
        let output = r#"[{"devDependencies":{"react":{"path":"/a/react"}},"dependencies":{"react":{"path":"/b/react"}}}]"#;
        assert_eq!(parse_listed_path(output, "react"), Some(PathBuf::from("/a/react")));
    }

    #[test]
    fn listed_path_handles_object_output() {
        let output = r#"{"dependencies":{"react":{"path":"/b/react"}}}"#;
        assert_eq!(parse_listed_path(output, "react"), Some(PathBuf::from("/b/react")));
        assert_eq!(parse_listed_path(output, "vue"), None);
        assert_eq!(parse_listed_path("not json", "react"), None);
    }
}
