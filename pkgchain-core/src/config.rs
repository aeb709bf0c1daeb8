//! Configuration discovery and merging.
//!
//! Config files are looked up from a working directory towards the
//! filesystem root. Every directory contributes at most one file:
//! `pkgchain.toml`, `pkgchain.json`, or a suffixed variant such as
//! `pkgchain.work.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::PackageFilter;

/// Package manager driving link, install and publish steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManagerKind {
    #[default]
    Pnpm,
    Npm,
}

impl PackageManagerKind {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManagerKind::Pnpm => "pnpm",
            PackageManagerKind::Npm => "npm",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pnpm" => Some(PackageManagerKind::Pnpm),
            "npm" => Some(PackageManagerKind::Npm),
            _ => None,
        }
    }
}

/// A single config file as written on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub items: IndexMap<String, PathBuf>,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub package_manager: Option<PackageManagerKind>,
    pub main_branch: Option<String>,
}

impl ConfigFile {
    /// Parses TOML, or JSON when the path ends in `.json`.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let is_json = path.extension().map_or(false, |ext| ext == "json");
        let parsed = if is_json {
            serde_json::from_str(content).map_err(|e| e.to_string())
        } else {
            toml::from_str(content).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(path, &content)
    }
}

/// Merged configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Symbolic name to package root.
    pub items: IndexMap<String, PathBuf>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub package_manager: PackageManagerKind,
    pub main_branch: String,
    /// Files that contributed, nearest first.
    pub sources: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            package_manager: PackageManagerKind::default(),
            main_branch: "master".to_string(),
            sources: Vec::new(),
        }
    }
}

pub fn is_config_file_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("pkgchain.") else {
        return false;
    };
    rest == "toml" || rest == "json" || rest.ends_with(".toml") || rest.ends_with(".json")
}

fn config_file_in(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map_or(false, |t| t.is_file()))
        .filter(|e| is_config_file_name(&e.file_name().to_string_lossy()))
        .map(|e| e.path())
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

impl Config {
    pub const ENV_CONFIG_PATH: &'static str = "PKGCHAIN_CONFIG_PATH";

    /// Config files from `start` up to the root, nearest first, followed by
    /// `extra` when given.
    pub fn find_config_paths(start: &Path, extra: Option<&Path>) -> Result<Vec<PathBuf>> {
        let start = if start.is_absolute() {
            start.to_path_buf()
        } else {
            std::env::current_dir()?.join(start)
        };

        let mut paths: Vec<PathBuf> = start.ancestors().filter_map(config_file_in).collect();
        if let Some(extra) = extra {
            if !paths.iter().any(|p| p == extra) {
                paths.push(extra.to_path_buf());
            }
        }
        Ok(paths)
    }

    /// Discovers and merges config files for `start`, honouring
    /// `PKGCHAIN_CONFIG_PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] if no file is found and
    /// [`Error::Config`] if a file fails to parse.
    pub fn discover(start: &Path) -> Result<Self> {
        let extra = std::env::var_os(Self::ENV_CONFIG_PATH).map(PathBuf::from);
        Self::discover_with(start, extra.as_deref())
    }

    pub fn discover_with(start: &Path, extra: Option<&Path>) -> Result<Self> {
        let paths = Self::find_config_paths(start, extra)?;
        if paths.is_empty() {
            return Err(Error::ConfigNotFound(start.to_path_buf()));
        }
        Self::from_files(&paths)
    }

    /// Loads and merges `paths` in order.
    pub fn from_files(paths: &[PathBuf]) -> Result<Self> {
        let mut config = Config::default();
        for path in paths {
            let file = ConfigFile::load(path)?;
            let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
            config.merge(file, base_dir);
            config.sources.push(path.clone());
        }
        config.finish();
        debug!(sources = config.sources.len(), items = config.items.len(), "loaded config");
        Ok(config)
    }

    /// Folds `file` into `self`. Lists are unioned; items and scalar settings
    /// from `file` replace existing ones.
    pub fn merge(&mut self, file: ConfigFile, base_dir: &Path) {
        let include: IndexSet<String> = self.include.drain(..).chain(file.include).collect();
        let exclude: IndexSet<String> = self.exclude.drain(..).chain(file.exclude).collect();
        self.include = include.into_iter().collect();
        self.exclude = exclude.into_iter().collect();

        for (name, path) in file.items {
            let location = if path.is_absolute() {
                path
            } else {
                base_dir.join(path)
            };
            self.items.insert(name, location);
        }

        if let Some(kind) = file.package_manager {
            self.package_manager = kind;
        }
        if let Some(branch) = file.main_branch {
            self.main_branch = branch;
        }
    }

    fn finish(&mut self) {
        if self.include.is_empty() {
            self.include = self.items.keys().cloned().collect();
        }
    }

    pub fn filter(&self) -> PackageFilter {
        PackageFilter::new(Some(self.include.clone()), self.exclude.clone())
    }

    /// Configured package names after include and exclude, in include order.
    pub fn package_names(&self) -> Vec<String> {
        let filter = self.filter();
        self.include
            .iter()
            .filter(|name| filter.allows(name))
            .cloned()
            .collect()
    }

    /// Items admitted by include and exclude, in item order.
    pub fn resolve_symbolic_names(&self) -> IndexMap<String, PathBuf> {
        let filter = self.filter();
        self.items
            .iter()
            .filter(|(name, _)| filter.allows(name))
            .map(|(name, path)| (name.clone(), path.clone()))
            .collect()
    }

    pub fn location_of(&self, name: &str) -> Result<&Path> {
        self.items
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| Error::PackageNotFound {
                name: name.to_string(),
                available: self.items.keys().cloned().collect::<Vec<_>>().join(", "),
            })
    }
}
