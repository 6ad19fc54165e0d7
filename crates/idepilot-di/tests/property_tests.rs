//! Property-based tests for graph invariants and order resolution

use std::collections::HashMap;

use proptest::prelude::*;

use idepilot_di::graph::{DependencyGraph, SortMode};
use idepilot_di::resolver::ServiceOrderResolver;

const POOL: [&str; 8] = ["s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7"];

#[derive(Debug, Clone)]
enum Op {
    Add(usize, Vec<usize>),
    Remove(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..POOL.len(), prop::collection::vec(0..POOL.len(), 0..4))
            .prop_map(|(node, deps)| Op::Add(node, deps)),
        (0..POOL.len()).prop_map(Op::Remove),
    ]
}

fn apply(graph: &mut DependencyGraph, ops: &[Op]) {
    for op in ops {
        match op {
            Op::Add(node, deps) => {
                let deps: Vec<&str> = deps.iter().map(|d| POOL[*d]).collect();
                graph.add_node(POOL[*node], &deps);
            }
            Op::Remove(node) => graph.remove_node(POOL[*node]),
        }
    }
}

proptest! {
    /// After any add/remove sequence, the forward and reverse views agree.
    #[test]
    fn add_remove_preserves_edge_symmetry(ops in prop::collection::vec(arb_op(), 1..40)) {
        let mut graph = DependencyGraph::new();
        apply(&mut graph, &ops);

        for name in POOL {
            for dep in graph.dependencies_of(name) {
                prop_assert!(
                    graph.dependents_of(&dep).contains(name),
                    "edge {name} -> {dep} missing from reverse view"
                );
            }
            for dependent in graph.dependents_of(name) {
                prop_assert!(
                    graph.dependencies_of(&dependent).contains(name),
                    "edge {dependent} -> {name} missing from forward view"
                );
            }
        }
    }
}

proptest! {
    /// Adding the same node with the same dependencies twice is a no-op.
    #[test]
    fn add_node_is_idempotent(node in 0..POOL.len(), deps in prop::collection::vec(0..POOL.len(), 0..4)) {
        let deps: Vec<&str> = deps.iter().map(|d| POOL[*d]).collect();

        let mut once = DependencyGraph::new();
        once.add_node(POOL[node], &deps);

        let mut twice = DependencyGraph::new();
        twice.add_node(POOL[node], &deps);
        twice.add_node(POOL[node], &deps);

        prop_assert_eq!(once.stats(), twice.stats());
        prop_assert_eq!(
            once.dependencies_of(POOL[node]),
            twice.dependencies_of(POOL[node])
        );
    }
}

/// Build an acyclic graph from per-node bitmasks: node `i` may only depend on
/// nodes with smaller indices.
fn build_dag(masks: &[u32]) -> (DependencyGraph, Vec<String>) {
    let names: Vec<String> = (0..masks.len()).map(|i| format!("svc{i:02}")).collect();
    let mut graph = DependencyGraph::new();
    for (i, mask) in masks.iter().enumerate() {
        let deps: Vec<&str> = (0..i)
            .filter(|j| mask & (1 << (j % 32)) != 0)
            .map(|j| names[j].as_str())
            .collect();
        graph.add_node(&names[i], &deps);
    }
    (graph, names)
}

proptest! {
    /// On any acyclic graph, the sort returns every node with dependencies first.
    #[test]
    fn topological_sort_is_a_valid_linearization(masks in prop::collection::vec(any::<u32>(), 3..24)) {
        let (graph, names) = build_dag(&masks);

        let order = graph.topological_sort(SortMode::Strict).unwrap();
        prop_assert_eq!(order.len(), names.len());

        let position: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), index))
            .collect();
        for name in &names {
            for dep in graph.dependencies_of(name) {
                prop_assert!(position[dep.as_str()] < position[name.as_str()]);
            }
        }
    }
}

proptest! {
    /// Grouping by category never violates the underlying dependency order:
    /// the flattened registration plan is itself a valid topological order.
    #[test]
    fn flattened_plan_respects_dependencies(masks in prop::collection::vec(any::<u32>(), 3..24)) {
        let names: Vec<String> = (0..masks.len()).map(|i| format!("svc{i:02}")).collect();
        let layer_count = names.len() / 4 + 1;
        let layers: Vec<String> = (0..layer_count).map(|l| format!("layer{l}")).collect();

        let mut resolver = ServiceOrderResolver::new();
        let layer_refs: Vec<&str> = layers.iter().map(String::as_str).collect();
        resolver.set_category_order(&layer_refs);

        // Dependencies point at smaller indices, so a service's category layer
        // is never earlier than any of its dependencies' layers.
        for (i, mask) in masks.iter().enumerate() {
            let deps: Vec<&str> = (0..i)
                .filter(|j| mask & (1 << (j % 32)) != 0)
                .map(|j| names[j].as_str())
                .collect();
            resolver.add_service(&names[i], &deps, &layers[i / 4]);
        }

        let resolved = resolver.resolve_order().unwrap();
        let flattened: Vec<&str> = resolved
            .registration_plan
            .iter()
            .flat_map(|group| group.services.iter().map(String::as_str))
            .collect();
        prop_assert_eq!(flattened.len(), names.len());

        let position: HashMap<&str, usize> = flattened
            .iter()
            .enumerate()
            .map(|(index, name)| (*name, index))
            .collect();
        for name in &names {
            for dep in resolver.graph().dependencies_of(name) {
                prop_assert!(
                    position[dep.as_str()] < position[name.as_str()],
                    "{} must precede {}", &dep, name
                );
            }
        }
    }
}
