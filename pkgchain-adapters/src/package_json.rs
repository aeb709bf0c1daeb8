use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use pkgchain_core::adapter::ManifestReader;
use pkgchain_core::error::{Error, Result};
use pkgchain_core::manifest::{Exemptions, ManifestSnapshot};
use serde::Deserialize;

/// Reads `package.json` manifests.
#[derive(Debug, Default, Clone, Copy)]
pub struct PackageJsonReader;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPackageJson {
    name: Option<String>,
    version: Option<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    peer_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    scripts: BTreeMap<String, String>,
    repository: Option<RawRepository>,
    #[serde(default)]
    pkgchain: RawExemptions,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRepository {
    Url(String),
    Detailed { url: Option<String> },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExemptions {
    #[serde(default)]
    self_version_accuracy_exempt: bool,
    #[serde(default)]
    deps_version_accuracy_exempt: BTreeSet<String>,
}

/// Parses `package.json` text found at `path`. A missing `name` is left empty.
pub fn parse_package_json(path: &Path, content: &str) -> Result<ManifestSnapshot> {
    let unreadable = |reason: String| Error::ManifestUnreadable {
        path: path.to_path_buf(),
        reason,
    };

    let raw: RawPackageJson =
        serde_json::from_str(content).map_err(|e| unreadable(format!("invalid JSON: {}", e)))?;
    // Projects may omit the name; graph nodes are checked when the graph is built.
    let name = raw.name.unwrap_or_default();

    let repository = raw.repository.and_then(|repo| match repo {
        RawRepository::Url(url) => Some(url),
        RawRepository::Detailed { url } => url,
    });

    Ok(ManifestSnapshot {
        name,
        version: raw.version,
        runtime: raw.dependencies,
        development: raw.dev_dependencies,
        peer: raw.peer_dependencies,
        scripts: raw.scripts,
        repository,
        exemptions: Exemptions {
            self_version_accuracy_exempt: raw.pkgchain.self_version_accuracy_exempt,
            dependency_accuracy_exempt: raw.pkgchain.deps_version_accuracy_exempt,
        },
    })
}

impl ManifestReader for PackageJsonReader {
    fn manifest_file(&self) -> &'static str {
        "package.json"
    }

    fn read_manifest(&self, path: &Path) -> Result<ManifestSnapshot> {
        let manifest_path = path.join(self.manifest_file());
        let content = fs::read_to_string(&manifest_path).map_err(|e| Error::ManifestUnreadable {
            path: manifest_path.clone(),
            reason: e.to_string(),
        })?;
        parse_package_json(&manifest_path, &content)
    }
}
