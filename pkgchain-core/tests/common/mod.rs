#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use pkgchain_core::error::{Error, Result};
use pkgchain_core::manifest::{DependencyKind, ManifestSnapshot};
use pkgchain_core::{Invocation, ManifestReader, Shell};

/// Manifests served from memory, keyed by package location.
#[derive(Debug, Default, Clone)]
pub struct MapReader {
    manifests: Arc<Mutex<HashMap<PathBuf, ManifestSnapshot>>>,
}

impl MapReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, location: impl Into<PathBuf>, manifest: ManifestSnapshot) {
        self.manifests
            .lock()
            .unwrap()
            .insert(location.into(), manifest);
    }
}

impl ManifestReader for MapReader {
    fn manifest_file(&self) -> &'static str {
        "package.json"
    }

    fn read_manifest(&self, path: &Path) -> Result<ManifestSnapshot> {
        self.manifests
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::ManifestUnreadable {
                path: path.to_path_buf(),
                reason: "no manifest".to_string(),
            })
    }
}

pub fn manifest(name: &str, version: &str) -> ManifestSnapshot {
    ManifestSnapshot::new(name).with_version(version)
}

pub fn depends(manifest: ManifestSnapshot, name: &str, range: &str) -> ManifestSnapshot {
    manifest.with_dependency(DependencyKind::Runtime, name, range)
}

/// Location used for a symbolic name in graph tests.
pub fn loc(name: &str) -> PathBuf {
    PathBuf::from("/work").join(name)
}

/// Builds a reader and an ordered name→location list from `(name, deps)` pairs.
pub fn chain(packages: &[(&str, &[&str])]) -> (MapReader, Vec<(String, PathBuf)>) {
    let reader = MapReader::new();
    let mut mapping = Vec::new();
    for (name, deps) in packages {
        let mut snapshot = manifest(name, "1.0.0");
        for dep in deps.iter() {
            snapshot = depends(snapshot, dep, "^1.0.0");
        }
        reader.insert(loc(name), snapshot);
        mapping.push((name.to_string(), loc(name)));
    }
    (reader, mapping)
}

/// Shell that records every invocation and answers captures from a script.
#[derive(Debug, Default, Clone)]
pub struct RecordingShell {
    calls: Arc<Mutex<Vec<(PathBuf, String)>>>,
    per_dir: Arc<Mutex<HashMap<(PathBuf, String), Option<String>>>>,
    fallback: Arc<Mutex<HashMap<String, Option<String>>>>,
}

impl RecordingShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output for `command` in any directory.
    pub fn respond(&self, command: &str, output: &str) -> &Self {
        self.fallback
            .lock()
            .unwrap()
            .insert(command.to_string(), Some(output.to_string()));
        self
    }

    /// Output for `command` in `dir` only.
    pub fn respond_in(&self, dir: impl Into<PathBuf>, command: &str, output: &str) -> &Self {
        self.per_dir
            .lock()
            .unwrap()
            .insert((dir.into(), command.to_string()), Some(output.to_string()));
        self
    }

    /// Makes `command` fail in `dir`.
    pub fn fail_in(&self, dir: impl Into<PathBuf>, command: &str) -> &Self {
        self.per_dir
            .lock()
            .unwrap()
            .insert((dir.into(), command.to_string()), None);
        self
    }

    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded commands, without directories.
    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, command)| command).collect()
    }

    pub fn commands_in(&self, dir: &Path) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(cwd, _)| cwd == dir)
            .map(|(_, command)| command)
            .collect()
    }

    fn answer(&self, cwd: &Path, command: &str) -> Option<Option<String>> {
        let key = (cwd.to_path_buf(), command.to_string());
        if let Some(answer) = self.per_dir.lock().unwrap().get(&key) {
            return Some(answer.clone());
        }
        self.fallback.lock().unwrap().get(command).cloned()
    }

    fn record(&self, cwd: &Path, invocation: &Invocation) -> Result<Option<String>> {
        let command = invocation.to_string();
        self.calls
            .lock()
            .unwrap()
            .push((cwd.to_path_buf(), command.clone()));
        match self.answer(cwd, &command) {
            Some(Some(output)) => Ok(Some(output)),
            Some(None) => Err(Error::CommandFailed {
                command,
                cwd: cwd.to_path_buf(),
                message: "scripted failure".to_string(),
            }),
            None => Ok(None),
        }
    }
}

impl Shell for RecordingShell {
    fn capture(&self, cwd: &Path, invocation: &Invocation) -> Result<String> {
        Ok(self.record(cwd, invocation)?.unwrap_or_default())
    }

    fn run(&self, cwd: &Path, invocation: &Invocation) -> Result<()> {
        self.record(cwd, invocation).map(|_| ())
    }
}

/// Package manager whose commands are easy to assert on.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeManager;

impl pkgchain_core::PackageManager for FakeManager {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn link_global(&self, packages: &[String]) -> Invocation {
        Invocation::new("fake", ["link", "-g"]).args(packages.iter().cloned())
    }

    fn unlink_global(&self, packages: &[String]) -> Invocation {
        Invocation::new("fake", ["unlink", "-g"]).args(packages.iter().cloned())
    }

    fn install_latest(&self, packages: &[String], kind: DependencyKind) -> Invocation {
        let invocation = Invocation::new("fake", ["install"]);
        let invocation = if kind == DependencyKind::Development {
            invocation.arg("-D")
        } else {
            invocation
        };
        invocation.args(packages.iter().map(|p| format!("{}@latest", p)))
    }

    fn run_script(&self, script: &str, args: &[String]) -> Invocation {
        Invocation::new("fake", ["run", script]).args(args.iter().cloned())
    }

    fn version_bump(&self, bump: pkgchain_core::BumpType) -> Invocation {
        Invocation::new("fake", ["version", bump.as_str()])
    }

    fn publish(&self) -> Invocation {
        Invocation::new("fake", ["publish"])
    }

    fn list_package(&self, package: &str) -> Invocation {
        Invocation::new("fake", ["list", package, "--json"])
    }

    fn view_repository_url(&self, package: &str) -> Invocation {
        Invocation::new("fake", ["view", package, "repository.url"])
    }
}

/// Asserts that `expected` appears in `actual` in order, gaps allowed.
pub fn assert_in_order(actual: &[String], expected: &[&str]) {
    let mut remaining = actual.iter();
    for wanted in expected {
        assert!(
            remaining.any(|command| command.as_str() == *wanted),
            "`{}` missing or out of order in {:#?}",
            wanted,
            actual
        );
    }
}
