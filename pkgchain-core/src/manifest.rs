//! Manifest snapshots taken once per package when a graph is built.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Relationship kind of a declared dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Runtime,
    Development,
    Peer,
}

impl DependencyKind {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::Runtime => "runtime",
            DependencyKind::Development => "development",
            DependencyKind::Peer => "peer",
        }
    }
}

/// Opt-outs from exact version accuracy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exemptions {
    /// Consumers of this package may accept any version in their declared range.
    #[serde(default)]
    pub self_version_accuracy_exempt: bool,
    /// Dependencies of this package that only need to satisfy their range.
    #[serde(default)]
    pub dependency_accuracy_exempt: BTreeSet<String>,
}

/// Immutable view of a package manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSnapshot {
    pub name: String,
    pub version: Option<String>,
    #[serde(default)]
    pub runtime: BTreeMap<String, String>,
    #[serde(default)]
    pub development: BTreeMap<String, String>,
    #[serde(default)]
    pub peer: BTreeMap<String, String>,
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
    pub repository: Option<String>,
    #[serde(default)]
    pub exemptions: Exemptions,
}

impl ManifestSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_dependency(
        mut self,
        kind: DependencyKind,
        name: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        self.dependencies_mut(kind).insert(name.into(), range.into());
        self
    }

    pub fn with_script(mut self, name: impl Into<String>, command: impl Into<String>) -> Self {
        self.scripts.insert(name.into(), command.into());
        self
    }

    pub fn with_exemptions(mut self, exemptions: Exemptions) -> Self {
        self.exemptions = exemptions;
        self
    }

    #[inline]
    pub fn dependencies(&self, kind: DependencyKind) -> &BTreeMap<String, String> {
        match kind {
            DependencyKind::Runtime => &self.runtime,
            DependencyKind::Development => &self.development,
            DependencyKind::Peer => &self.peer,
        }
    }

    fn dependencies_mut(&mut self, kind: DependencyKind) -> &mut BTreeMap<String, String> {
        match kind {
            DependencyKind::Runtime => &mut self.runtime,
            DependencyKind::Development => &mut self.development,
            DependencyKind::Peer => &mut self.peer,
        }
    }

    /// Names declared in any relationship kind. May yield a name more than once.
    pub fn pooled_dependency_names(&self) -> impl Iterator<Item = &str> {
        self.runtime
            .keys()
            .chain(self.development.keys())
            .chain(self.peer.keys())
            .map(String::as_str)
    }

    /// Declared range for `name`, runtime taking precedence over development.
    ///
    /// Peer declarations are not installed by the consumer and are ignored here.
    pub fn declared_range(&self, name: &str) -> Option<&str> {
        self.runtime
            .get(name)
            .or_else(|| self.development.get(name))
            .map(String::as_str)
    }

    #[inline]
    pub fn has_script(&self, name: &str) -> bool {
        self.scripts.contains_key(name)
    }

    #[inline]
    pub fn exempts_dependency(&self, name: &str) -> bool {
        self.exemptions.dependency_accuracy_exempt.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_range_wins_over_development() {
        let manifest = ManifestSnapshot::new("app")
            .with_dependency(DependencyKind::Development, "lib", "^1.0.0")
            .with_dependency(DependencyKind::Runtime, "lib", "^2.0.0");
        assert_eq!(manifest.declared_range("lib"), Some("^2.0.0"));
    }

    #[test]
    fn peer_only_dependency_has_no_declared_range() {
        let manifest =
            ManifestSnapshot::new("app").with_dependency(DependencyKind::Peer, "react", "^18.0.0");
        assert_eq!(manifest.declared_range("react"), None);
        assert_eq!(manifest.pooled_dependency_names().collect::<Vec<_>>(), vec!["react"]);
    }
}
