use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pkgchain_core::error::{Error, Result};
use pkgchain_core::graph::{DependencyGraph, PackageFilter};
use pkgchain_core::manifest::{DependencyKind, ManifestSnapshot};
use pkgchain_core::order::{bubble_order, order};
use pkgchain_core::ManifestReader;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

struct Manifests(HashMap<PathBuf, ManifestSnapshot>);

impl ManifestReader for Manifests {
    fn manifest_file(&self) -> &'static str {
        "package.json"
    }

    fn read_manifest(&self, path: &Path) -> Result<ManifestSnapshot> {
        self.0.get(path).cloned().ok_or_else(|| Error::ManifestUnreadable {
            path: path.to_path_buf(),
            reason: "missing".to_string(),
        })
    }
}

/// A chain where each package depends on up to `deps_per_package` earlier
/// ones, listed consumers first. Every `cycle_every`th package also depends
/// on its successor.
fn generate(count: usize, deps_per_package: usize, cycle_every: usize) -> (Manifests, Vec<(String, PathBuf)>) {
    let mut manifests = HashMap::with_capacity(count);
    let mut mapping = Vec::with_capacity(count);

    for i in (0..count).rev() {
        let name = format!("package-{}", i);
        let mut manifest = ManifestSnapshot::new(&name).with_version("1.0.0");
        for j in 1..=deps_per_package.min(i) {
            manifest = manifest.with_dependency(DependencyKind::Runtime, format!("package-{}", i - j), "^1.0.0");
        }
        if cycle_every > 0 && i % cycle_every == 0 && i + 1 < count {
            manifest = manifest.with_dependency(DependencyKind::Development, format!("package-{}", i + 1), "^1.0.0");
        }
        let location = PathBuf::from(format!("/work/{}", name));
        manifests.insert(location.clone(), manifest);
        mapping.push((name, location));
    }

    (Manifests(manifests), mapping)
}

fn benchmark_graph_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_construction");

    for count in [10, 50, 100, 200] {
        let (reader, mapping) = generate(count, 3, 0);
        group.bench_function(format!("{}_packages", count), |b| {
            b.iter(|| black_box(DependencyGraph::build(&reader, mapping.clone(), &PackageFilter::all()).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_insertion_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion_pass");

    for count in [10, 50, 100] {
        let (reader, mapping) = generate(count, 3, 0);
        let graph = DependencyGraph::build(&reader, mapping, &PackageFilter::all()).unwrap();
        group.bench_function(format!("{}_packages", count), |b| {
            b.iter(|| black_box(bubble_order(&graph)));
        });
    }

    group.finish();
}

fn benchmark_ordering_with_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordering_with_cycles");
    group.sample_size(20);

    for count in [10, 30, 60] {
        let (reader, mapping) = generate(count, 2, 5);
        let graph = DependencyGraph::build(&reader, mapping, &PackageFilter::all()).unwrap();
        group.bench_function(format!("{}_packages", count), |b| {
            b.iter(|| black_box(order(graph.clone())));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_graph_construction,
    benchmark_insertion_pass,
    benchmark_ordering_with_cycles
);
criterion_main!(benches);
