//! Workspace context tying configuration to the collaborator seams.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::actuality::{check_actuality, ActualityReport, DependencyState};
use crate::adapter::{ManifestReader, PackageManager};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::git::Git;
use crate::manifest::{DependencyKind, ManifestSnapshot};
use crate::order::{build_ordered_graph, OrderedGraph};
use crate::reporter::Reporter;
use crate::selection::SuitablePackages;
use crate::shell::{Invocation, Shell};
use crate::watch::WatchTarget;

/// Everything a command needs: merged config plus the manifest reader,
/// package manager, shell and reporter it should go through.
pub struct Workspace {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
    pub(crate) reader: Box<dyn ManifestReader>,
    pub(crate) manager: Box<dyn PackageManager>,
    pub(crate) shell: Box<dyn Shell>,
    pub(crate) reporter: Box<dyn Reporter>,
}

impl Workspace {
    pub fn new<R, S, P>(
        root: impl Into<PathBuf>,
        config: Config,
        reader: R,
        manager: Box<dyn PackageManager>,
        shell: S,
        reporter: P,
    ) -> Self
    where
        R: ManifestReader + 'static,
        S: Shell + 'static,
        P: Reporter + 'static,
    {
        Self {
            root: root.into(),
            config,
            reader: Box::new(reader),
            manager,
            shell: Box::new(shell),
            reporter: Box::new(reporter),
        }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn git(&self) -> Git<'_> {
        Git::new(self.shell.as_ref())
    }

    pub fn manifest(&self, dir: &Path) -> Result<ManifestSnapshot> {
        self.reader.read_manifest(dir)
    }

    pub(crate) fn run(&self, dir: &Path, invocation: &Invocation) -> Result<()> {
        self.shell.run(dir, invocation)
    }

    /// Builds a fresh ordered graph over the configured packages.
    pub fn ordered_graph(&self) -> Result<OrderedGraph> {
        let graph = build_ordered_graph(
            self.reader.as_ref(),
            self.config.items.clone(),
            &self.config.filter(),
        )?;
        debug!(packages = graph.len(), "ordered graph");
        Ok(graph)
    }

    fn ordered_graph_or_fail(&self) -> Result<OrderedGraph> {
        let graph = self.ordered_graph()?;
        if graph.is_empty() {
            return Err(Error::NoPackages);
        }
        Ok(graph)
    }

    pub fn suitable(&self, project: &ManifestSnapshot) -> SuitablePackages {
        SuitablePackages::select(&self.config.package_names(), project)
    }

    /// Current state of every suitable dependency of `project`.
    ///
    /// Dependency manifests are read again here, so versions bumped earlier
    /// in the same run are seen. Cycle membership comes from `graph`.
    pub fn dependency_states(
        &self,
        project: &ManifestSnapshot,
        graph: &OrderedGraph,
    ) -> Result<Vec<DependencyState>> {
        self.suitable(project)
            .all
            .into_iter()
            .map(|name| {
                let node = graph.get(&name);
                let location = match node {
                    Some(node) => node.location.clone(),
                    None => self.config.location_of(&name)?.to_path_buf(),
                };
                let manifest = self.reader.read_manifest(&location)?;
                let in_cycle = node.map_or(false, |n| n.participates_in_cycle);
                Ok(DependencyState {
                    name,
                    ..DependencyState::from_manifest(&manifest, in_cycle)
                })
            })
            .collect()
    }

    pub fn check_manifest(
        &self,
        project: &ManifestSnapshot,
        graph: &OrderedGraph,
        force_exact: bool,
    ) -> Result<ActualityReport> {
        let states = self.dependency_states(project, graph)?;
        check_actuality(project, &states, force_exact)
    }

    /// Actuality of the suitable dependencies of the package in `project_dir`.
    pub fn check(&self, project_dir: &Path, force_exact: bool) -> Result<ActualityReport> {
        let graph = self.ordered_graph()?;
        let project = self.manifest(project_dir)?;
        self.check_manifest(&project, &graph, force_exact)
    }

    /// Globally links every suitable package into `project_dir`.
    pub fn link(&self, project_dir: &Path) -> Result<Vec<String>> {
        let project = self.manifest(project_dir)?;
        let suitable = self.suitable(&project);
        if suitable.is_empty() {
            self.reporter.note("Nothing to link");
            return Ok(Vec::new());
        }
        self.run(project_dir, &self.manager.link_global(&suitable.all))?;
        self.reporter
            .done(&format!("Linked: {}", suitable.all.join(", ")));
        Ok(suitable.all)
    }

    pub fn unlink(&self, project_dir: &Path) -> Result<Vec<String>> {
        let project = self.manifest(project_dir)?;
        let suitable = self.suitable(&project);
        if suitable.is_empty() {
            self.reporter.note("Nothing to unlink");
            return Ok(Vec::new());
        }
        self.run(project_dir, &self.manager.unlink_global(&suitable.all))?;
        self.reporter
            .done(&format!("Unlinked: {}", suitable.all.join(", ")));
        Ok(suitable.all)
    }

    /// Links every configured package, providers first.
    pub fn link_recursive(&self) -> Result<()> {
        let graph = self.ordered_graph_or_fail()?;
        for node in &graph {
            self.reporter
                .step(&format!("Linking into {}", node.location.display()));
            self.link(&node.location)?;
        }
        Ok(())
    }

    /// Installs the latest published version of every suitable package.
    ///
    /// Returns false when the project consumes none of them.
    pub fn install_latest(&self, project_dir: &Path) -> Result<bool> {
        let project = self.manifest(project_dir)?;
        let suitable = self.suitable(&project);
        if suitable.runtime.is_empty() && suitable.development.is_empty() {
            self.reporter
                .note(&format!("{}: nothing to install", project_dir.display()));
            return Ok(false);
        }
        if !suitable.runtime.is_empty() {
            let invocation = self
                .manager
                .install_latest(&suitable.runtime, DependencyKind::Runtime);
            self.run(project_dir, &invocation)?;
        }
        if !suitable.development.is_empty() {
            let invocation = self
                .manager
                .install_latest(&suitable.development, DependencyKind::Development);
            self.run(project_dir, &invocation)?;
        }
        Ok(true)
    }

    /// [`Self::install_latest`] for every manifest below `root`, linking
    /// afterwards when `link` is set.
    pub fn install_latest_recursive(&self, root: &Path, link: bool) -> Result<usize> {
        let mut installed = 0;
        for dir in manifest_dirs(root, self.reader.manifest_file()) {
            if self.install_latest(&dir)? {
                installed += 1;
                if link {
                    self.link(&dir)?;
                }
            }
        }
        Ok(installed)
    }

    /// Runs `script` in every ordered package that declares it.
    ///
    /// Returns the symbolic names of the packages it ran in.
    pub fn run_script_recursive(&self, script: &str, args: &[String]) -> Result<Vec<String>> {
        let graph = self.ordered_graph_or_fail()?;
        let mut ran = Vec::new();
        for node in &graph {
            if !node.manifest.has_script(script) {
                continue;
            }
            let path = node.location.display();
            self.reporter.step(&format!("Running {} in {}", script, path));
            self.run(&node.location, &self.manager.run_script(script, args))?;
            self.reporter.done(&format!("Ran {} in {}", script, path));
            ran.push(node.symbolic_name.clone());
        }
        if ran.is_empty() {
            self.reporter
                .note(&format!("No packages found with a runnable {} script", script));
        }
        info!(script, count = ran.len(), "script finished");
        Ok(ran)
    }

    /// Packages with a `watch` script, in dependency order.
    pub fn watch_targets(&self) -> Result<Vec<WatchTarget>> {
        let graph = self.ordered_graph_or_fail()?;
        let targets: Vec<WatchTarget> = graph
            .iter()
            .filter(|node| node.manifest.has_script("watch"))
            .map(|node| WatchTarget {
                name: node.symbolic_name.clone(),
                dir: node.location.clone(),
                invocation: self.manager.run_script("watch", &[]),
            })
            .collect();
        if targets.is_empty() {
            return Err(Error::Watch("No watchable packages found".to_string()));
        }
        Ok(targets)
    }

    /// Opens every contributing config file in `editor`, a program followed
    /// by optional arguments such as `code --wait`.
    pub fn edit(&self, editor: &str) -> Result<usize> {
        if self.config.sources.is_empty() {
            self.reporter.note("No config files found");
            return Ok(0);
        }
        let mut words = editor.split_whitespace();
        let Some(program) = words.next() else {
            self.reporter.note("No editor configured");
            return Ok(0);
        };
        let leading: Vec<&str> = words.collect();
        for source in &self.config.sources {
            let invocation = Invocation::new(program, leading.iter().copied())
                .arg(source.display().to_string());
            self.run(&self.root, &invocation)?;
        }
        Ok(self.config.sources.len())
    }
}

/// Directories below `root` holding `manifest_file`, skipping
/// `node_modules` and hidden directories.
pub fn manifest_dirs(root: &Path, manifest_file: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            entry.depth() == 0 || !(name == "node_modules" || name.starts_with('.'))
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == manifest_file)
        .filter_map(|entry| entry.path().parent().map(Path::to_path_buf))
        .collect()
}
