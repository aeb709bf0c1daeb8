use std::collections::HashSet;
use std::path::PathBuf;

use pkgchain_core::manifest::{DependencyKind, ManifestSnapshot};
use pkgchain_core::{DependencyGraph, OrderedGraph, PackageNode};
use proptest::prelude::*;

const NAMES: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

/// Random dependency matrices over up to six packages, cycles included.
fn gen_nodes() -> impl Strategy<Value = Vec<PackageNode>> {
    (1..=NAMES.len())
        .prop_flat_map(|count| (Just(count), prop::collection::vec(any::<bool>(), count * count)))
        .prop_map(|(count, edges)| {
            (0..count)
                .map(|c| {
                    let manifest = (0..count)
                        .filter(|&p| p != c && edges[c * count + p])
                        .fold(ManifestSnapshot::new(NAMES[c]), |m, p| {
                            m.with_dependency(DependencyKind::Runtime, NAMES[p], "^1.0.0")
                        });
                    PackageNode::new(NAMES[c], PathBuf::from(NAMES[c]), manifest)
                })
                .collect()
        })
}

fn order(nodes: Vec<PackageNode>) -> OrderedGraph {
    OrderedGraph::from(DependencyGraph::new(nodes))
}

proptest! {
    #[test]
    fn test_every_node_appears_exactly_once(nodes in gen_nodes()) {
        let count = nodes.len();
        let graph = order(nodes);

        prop_assert_eq!(graph.len(), count);
        let mut seen = HashSet::new();
        for name in graph.symbolic_names() {
            prop_assert!(seen.insert(name.to_string()), "Duplicate package in order: {}", name);
        }
    }

    #[test]
    fn test_ordering_is_deterministic(nodes in gen_nodes()) {
        let first = order(nodes.clone());
        let second = order(nodes);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_providers_precede_non_providers(nodes in gen_nodes()) {
        let graph = order(nodes);
        let first_consumer_only = graph
            .iter()
            .position(|n| !n.is_dependency_of_another)
            .unwrap_or(graph.len());
        prop_assert!(graph.iter().skip(first_consumer_only).all(|n| !n.is_dependency_of_another));
    }

    #[test]
    fn test_acyclic_providers_come_first(nodes in gen_nodes()) {
        let graph = DependencyGraph::new(nodes.clone());
        let has_cycle = graph.cycle_members().into_iter().any(|cyclic| cyclic);
        let ordered = order(nodes);

        if !has_cycle {
            let position = |name: &str| ordered.iter().position(|n| n.symbolic_name == name);
            for node in ordered.iter() {
                for dep in node.manifest.runtime.keys() {
                    prop_assert!(position(dep) < position(&node.symbolic_name));
                }
            }
        }
    }
}
