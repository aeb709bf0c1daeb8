//! Best-effort dependency ordering that tolerates cycles.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::adapter::ManifestReader;
use crate::error::Result;
use crate::graph::{DependencyGraph, PackageFilter, PackageNode};

/// Packages ordered providers-first, each carrying its annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrderedGraph {
    nodes: Vec<PackageNode>,
}

impl OrderedGraph {
    #[inline]
    pub fn nodes(&self) -> &[PackageNode] {
        &self.nodes
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, PackageNode> {
        self.nodes.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn symbolic_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.symbolic_name.as_str()).collect()
    }

    pub fn get(&self, symbolic_name: &str) -> Option<&PackageNode> {
        self.nodes.iter().find(|n| n.symbolic_name == symbolic_name)
    }

    /// Looks a node up by the package name its manifest declares.
    pub fn find_by_package_name(&self, package_name: &str) -> Option<&PackageNode> {
        self.nodes.iter().find(|n| n.manifest.name == package_name)
    }

    pub fn cycle_members(&self) -> impl Iterator<Item = &PackageNode> {
        self.nodes.iter().filter(|n| n.participates_in_cycle)
    }

    pub fn into_nodes(self) -> Vec<PackageNode> {
        self.nodes
    }
}

impl<'a> IntoIterator for &'a OrderedGraph {
    type Item = &'a PackageNode;
    type IntoIter = std::slice::Iter<'a, PackageNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl From<DependencyGraph> for OrderedGraph {
    fn from(graph: DependencyGraph) -> Self {
        order(graph)
    }
}

/// Insertion pass that moves providers in front of their consumers.
///
/// For each position, the first later node the current one depends on is
/// moved into that position. A position is re-scanned only while the moves
/// keep producing arrangements that have not been seen yet, so cycles settle
/// instead of oscillating.
///
/// Returns indexes into [`DependencyGraph::nodes`].
pub fn bubble_order(graph: &DependencyGraph) -> Vec<usize> {
    let mut order: Vec<usize> = (0..graph.len()).collect();
    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    seen.insert(order.clone());

    let mut i = 0;
    while i < order.len() {
        let mut rescan = false;
        let provider = (i + 1..order.len()).find(|&j| graph.depends_on(order[i], order[j]));
        if let Some(j) = provider {
            let moved = order.remove(j);
            order.insert(i, moved);
            rescan = seen.insert(order.clone());
        }
        if !rescan {
            i += 1;
        }
    }

    debug!(arrangements = seen.len(), "insertion pass settled");
    order
}

/// Orders and annotates every node of `graph`.
///
/// The insertion pass result is stably re-sorted so that packages other
/// packages depend on come first and, among those, cycle members lead.
pub fn order(graph: DependencyGraph) -> OrderedGraph {
    let arranged = bubble_order(&graph);
    let provides: Vec<bool> = (0..graph.len())
        .map(|node| graph.is_dependency_of_another(node))
        .collect();
    let cyclic = graph.cycle_members();

    let mut ordered = arranged;
    ordered.sort_by_key(|&node| (Reverse(provides[node]), Reverse(cyclic[node])));

    let mut slots: Vec<Option<PackageNode>> = graph
        .into_nodes()
        .into_iter()
        .enumerate()
        .map(|(index, mut node)| {
            node.is_dependency_of_another = provides[index];
            node.participates_in_cycle = cyclic[index];
            Some(node)
        })
        .collect();

    let nodes = ordered
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect();

    OrderedGraph { nodes }
}

/// Reads manifests, builds the graph and orders it.
///
/// # Errors
///
/// Propagates [`crate::Error::ManifestUnreadable`] and
/// [`crate::Error::DuplicateSymbolicName`] from graph construction. Cycles
/// are never an error.
pub fn build_ordered_graph<R, I>(
    reader: &R,
    name_to_location: I,
    filter: &PackageFilter,
) -> Result<OrderedGraph>
where
    R: ManifestReader + ?Sized,
    I: IntoIterator<Item = (String, PathBuf)>,
{
    let graph = DependencyGraph::build(reader, name_to_location, filter)?;
    Ok(order(graph))
}
