//! Dependency graph built from manifest snapshots using petgraph.

use std::collections::HashSet;
use std::path::PathBuf;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::adapter::ManifestReader;
use crate::error::{Error, Result};
use crate::manifest::ManifestSnapshot;

/// One participating package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageNode {
    pub symbolic_name: String,
    pub location: PathBuf,
    pub manifest: ManifestSnapshot,
    pub is_dependency_of_another: bool,
    pub participates_in_cycle: bool,
}

impl PackageNode {
    pub fn new(
        symbolic_name: impl Into<String>,
        location: impl Into<PathBuf>,
        manifest: ManifestSnapshot,
    ) -> Self {
        Self {
            symbolic_name: symbolic_name.into(),
            location: location.into(),
            manifest,
            is_dependency_of_another: false,
            participates_in_cycle: false,
        }
    }
}

/// Allow-list and deny-list over symbolic names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageFilter {
    /// `None` admits every name.
    pub include: Option<Vec<String>>,
    /// Applied after `include`.
    pub exclude: Vec<String>,
}

impl PackageFilter {
    pub fn new(include: Option<Vec<String>>, exclude: Vec<String>) -> Self {
        Self { include, exclude }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn allows(&self, name: &str) -> bool {
        let included = self
            .include
            .as_ref()
            .map_or(true, |include| include.iter().any(|n| n == name));
        included && !self.exclude.iter().any(|n| n == name)
    }
}

/// Returns true if `consumer` declares `provider` in any dependency kind, or
/// declares any package under the `@<provider>/` scope.
pub fn depends_on(consumer: &ManifestSnapshot, provider: &ManifestSnapshot) -> bool {
    if provider.name.is_empty() {
        return false;
    }
    let scope_prefix = format!("@{}/", provider.name);
    consumer
        .pooled_dependency_names()
        .any(|dep| dep == provider.name || dep.starts_with(&scope_prefix))
}

#[inline]
pub fn provides_for(provider: &ManifestSnapshot, consumer: &ManifestSnapshot) -> bool {
    depends_on(consumer, provider)
}

/// Reads the manifest of every package admitted by `filter`.
///
/// Node order follows the input order. Both annotations start out `false`.
///
/// # Errors
///
/// Returns [`Error::ManifestUnreadable`] if a manifest cannot be read or
/// declares no package name, and
/// [`Error::DuplicateSymbolicName`] if a symbolic name repeats or two
/// manifests declare the same package name.
pub fn build_nodes<R, I>(reader: &R, name_to_location: I, filter: &PackageFilter) -> Result<Vec<PackageNode>>
where
    R: ManifestReader + ?Sized,
    I: IntoIterator<Item = (String, PathBuf)>,
{
    let mut seen = HashSet::new();
    let mut selected = Vec::new();
    for (name, location) in name_to_location {
        if !filter.allows(&name) {
            continue;
        }
        if !seen.insert(name.clone()) {
            return Err(Error::DuplicateSymbolicName { name });
        }
        selected.push((name, location));
    }

    let nodes: Vec<PackageNode> = selected
        .into_par_iter()
        .map(|(name, location)| {
            let manifest = reader.read_manifest(&location)?;
            if manifest.name.is_empty() {
                return Err(Error::ManifestUnreadable {
                    path: location,
                    reason: "missing package name".to_string(),
                });
            }
            Ok(PackageNode::new(name, location, manifest))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut declared = HashSet::new();
    for node in &nodes {
        if !declared.insert(node.manifest.name.as_str()) {
            return Err(Error::DuplicateSymbolicName {
                name: node.manifest.name.clone(),
            });
        }
    }

    debug!(count = nodes.len(), "built package nodes");
    Ok(nodes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Resolved,
}

/// Directed graph of packages. Edges point from consumer to provider.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: Vec<PackageNode>,
    graph: DiGraph<String, ()>,
    // relation[consumer][provider]
    relation: Vec<Vec<bool>>,
}

impl DependencyGraph {
    /// Creates a graph and evaluates the dependency relation for every
    /// ordered pair of distinct nodes once.
    pub fn new(nodes: Vec<PackageNode>) -> Self {
        let mut graph = DiGraph::with_capacity(nodes.len(), nodes.len());
        for node in &nodes {
            graph.add_node(node.symbolic_name.clone());
        }

        let relation: Vec<Vec<bool>> = nodes
            .iter()
            .enumerate()
            .map(|(c, consumer)| {
                nodes
                    .iter()
                    .enumerate()
                    .map(|(p, provider)| c != p && depends_on(&consumer.manifest, &provider.manifest))
                    .collect()
            })
            .collect();

        for (c, row) in relation.iter().enumerate() {
            for (p, &edge) in row.iter().enumerate() {
                if edge {
                    graph.add_edge(NodeIndex::new(c), NodeIndex::new(p), ());
                }
            }
        }

        Self {
            nodes,
            graph,
            relation,
        }
    }

    /// Reads manifests and builds the graph in one step.
    pub fn build<R, I>(reader: &R, name_to_location: I, filter: &PackageFilter) -> Result<Self>
    where
        R: ManifestReader + ?Sized,
        I: IntoIterator<Item = (String, PathBuf)>,
    {
        Ok(Self::new(build_nodes(reader, name_to_location, filter)?))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn nodes(&self) -> &[PackageNode] {
        &self.nodes
    }

    pub fn index_of(&self, symbolic_name: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.symbolic_name == symbolic_name)
    }

    #[inline]
    pub fn depends_on(&self, consumer: usize, provider: usize) -> bool {
        self.relation[consumer][provider]
    }

    #[inline]
    pub fn provides_for(&self, provider: usize, consumer: usize) -> bool {
        self.relation[consumer][provider]
    }

    /// Direct providers of `node`, in node order.
    pub fn dependencies(&self, node: usize) -> Vec<usize> {
        (0..self.len()).filter(|&p| self.relation[node][p]).collect()
    }

    /// Direct consumers of `node`, in node order.
    pub fn dependents(&self, node: usize) -> Vec<usize> {
        (0..self.len()).filter(|&c| self.relation[c][node]).collect()
    }

    pub fn is_dependency_of_another(&self, node: usize) -> bool {
        self.relation.iter().any(|row| row[node])
    }

    /// True if `root` can reach itself by following dependency edges.
    pub fn participates_in_cycle(&self, root: usize) -> bool {
        let root = NodeIndex::new(root);
        let mut marks = vec![Mark::Unvisited; self.graph.node_count()];
        marks[root.index()] = Mark::OnStack;
        let mut stack = vec![(root, self.graph.neighbors_directed(root, Direction::Outgoing))];

        loop {
            let Some((node, neighbors)) = stack.last_mut() else {
                break;
            };
            let node = *node;
            match neighbors.next() {
                Some(next) => {
                    let mark = marks[next.index()];
                    match mark {
                        Mark::OnStack if next == root => return true,
                        Mark::Unvisited => {
                            marks[next.index()] = Mark::OnStack;
                            stack.push((next, self.graph.neighbors_directed(next, Direction::Outgoing)));
                        }
                        Mark::OnStack | Mark::Resolved => {}
                    }
                }
                None => {
                    marks[node.index()] = Mark::Resolved;
                    stack.pop();
                }
            }
        }

        false
    }

    /// Cycle membership of every node, indexed like [`Self::nodes`].
    pub fn cycle_members(&self) -> Vec<bool> {
        (0..self.len())
            .map(|node| self.participates_in_cycle(node))
            .collect()
    }

    pub(crate) fn into_nodes(self) -> Vec<PackageNode> {
        self.nodes
    }
}
