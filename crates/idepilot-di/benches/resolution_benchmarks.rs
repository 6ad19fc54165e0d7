//! Benchmarks for graph construction and order resolution

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use idepilot_di::graph::{DependencyGraph, SortMode};
use idepilot_di::resolver::ServiceOrderResolver;

const LAYERS: usize = 8;
const PER_LAYER: usize = 16;

fn layered_names() -> Vec<Vec<String>> {
    (0..LAYERS)
        .map(|layer| {
            (0..PER_LAYER)
                .map(|index| format!("layer{layer}_svc{index}"))
                .collect()
        })
        .collect()
}

fn layered_graph() -> DependencyGraph {
    let names = layered_names();
    let mut graph = DependencyGraph::new();
    for (layer, services) in names.iter().enumerate() {
        for (index, service) in services.iter().enumerate() {
            let deps: Vec<&str> = if layer == 0 {
                Vec::new()
            } else {
                vec![
                    names[layer - 1][index % PER_LAYER].as_str(),
                    names[layer - 1][(index + 1) % PER_LAYER].as_str(),
                ]
            };
            graph.add_node(service, &deps);
        }
    }
    graph
}

fn layered_resolver() -> ServiceOrderResolver {
    let names = layered_names();
    let categories: Vec<String> = (0..LAYERS).map(|layer| format!("tier{layer}")).collect();
    let mut resolver = ServiceOrderResolver::new();
    let category_refs: Vec<&str> = categories.iter().map(String::as_str).collect();
    resolver.set_category_order(&category_refs);
    for (layer, services) in names.iter().enumerate() {
        for (index, service) in services.iter().enumerate() {
            let deps: Vec<&str> = if layer == 0 {
                Vec::new()
            } else {
                vec![
                    names[layer - 1][index % PER_LAYER].as_str(),
                    names[layer - 1][(index + 1) % PER_LAYER].as_str(),
                ]
            };
            resolver.add_service(service, &deps, &categories[layer]);
        }
    }
    resolver
}

fn benchmark_graph_construction(c: &mut Criterion) {
    c.bench_function("build_layered_graph", |b| {
        b.iter(|| black_box(layered_graph()))
    });
}

fn benchmark_cycle_detection(c: &mut Criterion) {
    let graph = layered_graph();
    c.bench_function("detect_cycles", |b| {
        b.iter(|| black_box(graph.detect_cycles()))
    });
}

fn benchmark_topological_sort(c: &mut Criterion) {
    let graph = layered_graph();
    c.bench_function("topological_sort", |b| {
        b.iter(|| black_box(graph.topological_sort(SortMode::Strict)))
    });
}

fn benchmark_resolve_order(c: &mut Criterion) {
    let resolver = layered_resolver();
    c.bench_function("resolve_order", |b| {
        b.iter(|| black_box(resolver.resolve_order()))
    });
}

criterion_group!(
    benches,
    benchmark_graph_construction,
    benchmark_cycle_detection,
    benchmark_topological_sort,
    benchmark_resolve_order
);
criterion_main!(benches);
