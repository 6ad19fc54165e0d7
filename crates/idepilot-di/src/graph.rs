//! Directed dependency graph over service names
//!
//! The graph keeps two adjacency views in lock-step: a forward map from each
//! node to the nodes it depends on, and a reverse map from each node to the
//! nodes that depend on it. The reverse map makes dependents lookups O(1) and
//! drives the decrement phase of Kahn's algorithm.
//!
//! A dependency may be referenced before it is added as a node; referential
//! integrity is checked separately by [`DependencyGraph::validate`] rather
//! than at edge-insertion time.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{DiError, DiResult};

/// Behavior of [`DependencyGraph::topological_sort`] when the Kahn pass
/// cannot process every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Fail with [`DiError::IncompleteSort`] naming the unprocessed nodes.
    Strict,
    /// Log a warning and return the partial order. Intended for teardown
    /// sequences where the graph may be mutated mid-shutdown.
    Lenient,
}

/// Node and edge counts for introspection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    /// Nodes with no dependencies of their own
    pub roots: usize,
    /// Nodes nothing else depends on
    pub leaves: usize,
}

/// Result of a referential-integrity check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    /// Service name to the dependency names it references that were never
    /// added as nodes themselves
    pub missing_dependencies: HashMap<String, Vec<String>>,
}

/// Directed graph of service names and their declared dependencies
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Forward view: node -> the nodes it depends on
    dependencies: HashMap<String, HashSet<String>>,
    /// Reverse view: node -> the nodes that depend on it
    dependents: HashMap<String, HashSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` with the given dependencies.
    ///
    /// Idempotent: repeated calls merge dependency sets rather than
    /// overwrite. Dependency names that are not yet nodes get a reverse-map
    /// entry so they can be referenced before being added, but they do not
    /// become nodes until added themselves.
    pub fn add_node(&mut self, name: &str, dependencies: &[&str]) {
        let forward = self.dependencies.entry(name.to_string()).or_default();
        for dep in dependencies {
            forward.insert((*dep).to_string());
        }
        self.dependents.entry(name.to_string()).or_default();
        for dep in dependencies {
            self.dependents
                .entry((*dep).to_string())
                .or_default()
                .insert(name.to_string());
        }
        debug!(node = name, dependencies = dependencies.len(), "graph node added");
    }

    /// Remove `name` and every edge touching it from both views.
    ///
    /// No-op if `name` is unknown.
    pub fn remove_node(&mut self, name: &str) {
        let removed_deps = self.dependencies.remove(name);
        let removed_dependents = self.dependents.remove(name);
        if removed_deps.is_none() && removed_dependents.is_none() {
            return;
        }
        if let Some(deps) = removed_deps {
            for dep in deps {
                if let Some(set) = self.dependents.get_mut(&dep) {
                    set.remove(name);
                }
            }
        }
        if let Some(dependents) = removed_dependents {
            for dependent in dependents {
                if let Some(set) = self.dependencies.get_mut(&dependent) {
                    set.remove(name);
                }
            }
        }
        debug!(node = name, "graph node removed");
    }

    /// Whether `name` was explicitly added as a node. Names that only appear
    /// as dependencies of other nodes do not count.
    pub fn has_node(&self, name: &str) -> bool {
        self.dependencies.contains_key(name)
    }

    /// Direct dependencies of `name`; empty for unknown names.
    pub fn dependencies_of(&self, name: &str) -> HashSet<String> {
        self.dependencies.get(name).cloned().unwrap_or_default()
    }

    /// Direct dependents of `name`; empty for unknown names.
    pub fn dependents_of(&self, name: &str) -> HashSet<String> {
        self.dependents.get(name).cloned().unwrap_or_default()
    }

    /// All explicitly added node names, sorted.
    pub fn node_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.dependencies.keys().cloned().collect();
        names.sort();
        names
    }

    /// Depth-first search from every unvisited node, recording a cycle each
    /// time traversal revisits a node currently on the recursion stack.
    ///
    /// Each reported cycle is the slice of the path from the first occurrence
    /// of the revisited node through the current node, closed by repeating
    /// that node. Self-dependencies are reported as 1-node cycles.
    pub fn detect_cycles(&self) -> Vec<Vec<String>> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut path: Vec<String> = Vec::new();
        let mut on_path: HashSet<String> = HashSet::new();
        let mut cycles: Vec<Vec<String>> = Vec::new();

        for node in self.node_names() {
            if !visited.contains(&node) {
                self.walk_cycles(&node, &mut visited, &mut path, &mut on_path, &mut cycles);
            }
        }

        if !cycles.is_empty() {
            warn!(cycles = cycles.len(), "circular dependencies detected");
        }
        cycles
    }

    fn walk_cycles(
        &self,
        node: &str,
        visited: &mut HashSet<String>,
        path: &mut Vec<String>,
        on_path: &mut HashSet<String>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        if on_path.contains(node) {
            let start = path.iter().position(|n| n == node).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..].to_vec();
            cycle.push(node.to_string());
            cycles.push(cycle);
            return;
        }
        if visited.contains(node) {
            return;
        }
        visited.insert(node.to_string());
        path.push(node.to_string());
        on_path.insert(node.to_string());

        if let Some(deps) = self.dependencies.get(node) {
            let mut deps: Vec<&String> = deps.iter().collect();
            deps.sort();
            for dep in deps {
                self.walk_cycles(dep, visited, path, on_path, cycles);
            }
        }

        path.pop();
        on_path.remove(node);
    }

    /// Kahn's algorithm over the registered nodes.
    ///
    /// Cycle detection runs first; any cycle fails the sort outright since a
    /// topological order is undefined for cyclic graphs. In-degrees count
    /// only dependencies that are themselves registered nodes, so dangling
    /// references do not block sorting (they are surfaced by [`validate`]
    /// instead).
    ///
    /// [`validate`]: DependencyGraph::validate
    pub fn topological_sort(&self, mode: SortMode) -> DiResult<Vec<String>> {
        let cycles = self.detect_cycles();
        if !cycles.is_empty() {
            return Err(DiError::CircularDependencies { cycles });
        }

        let mut in_degree: HashMap<&str, usize> = HashMap::new();
        for (node, deps) in &self.dependencies {
            let registered = deps
                .iter()
                .filter(|dep| self.dependencies.contains_key(dep.as_str()))
                .count();
            in_degree.insert(node.as_str(), registered);
        }

        let mut seeds: Vec<&str> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(node, _)| *node)
            .collect();
        seeds.sort();
        let mut queue: VecDeque<&str> = seeds.into();

        let mut order: Vec<String> = Vec::with_capacity(self.dependencies.len());
        while let Some(node) = queue.pop_front() {
            order.push(node.to_string());
            if let Some(dependents) = self.dependents.get(node) {
                let mut dependents: Vec<&String> = dependents.iter().collect();
                dependents.sort();
                for dependent in dependents {
                    if let Some(degree) = in_degree.get_mut(dependent.as_str()) {
                        *degree -= 1;
                        if *degree == 0 {
                            queue.push_back(dependent.as_str());
                        }
                    }
                }
            }
        }

        if order.len() != self.dependencies.len() {
            let processed: HashSet<&str> = order.iter().map(String::as_str).collect();
            let mut unprocessed: Vec<String> = self
                .dependencies
                .keys()
                .filter(|node| !processed.contains(node.as_str()))
                .cloned()
                .collect();
            unprocessed.sort();
            match mode {
                SortMode::Strict => return Err(DiError::IncompleteSort { unprocessed }),
                SortMode::Lenient => {
                    warn!(
                        unprocessed = ?unprocessed,
                        "topological sort incomplete, returning partial order"
                    );
                    return Ok(order);
                }
            }
        }

        debug!(nodes = order.len(), "topological sort complete");
        Ok(order)
    }

    /// Referential-integrity check: flags dependency names that were never
    /// added as nodes themselves. Orthogonal to cycle detection.
    pub fn validate(&self) -> ValidationReport {
        let mut missing: HashMap<String, Vec<String>> = HashMap::new();
        for (node, deps) in &self.dependencies {
            let mut absent: Vec<String> = deps
                .iter()
                .filter(|dep| !self.dependencies.contains_key(dep.as_str()))
                .cloned()
                .collect();
            if !absent.is_empty() {
                absent.sort();
                missing.insert(node.clone(), absent);
            }
        }
        ValidationReport {
            is_valid: missing.is_empty(),
            missing_dependencies: missing,
        }
    }

    /// Transitive closure of everything that depends on `name`, directly or
    /// indirectly. A visited set keeps diamonds from looping.
    pub fn transitive_dependents(&self, name: &str) -> Vec<String> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        let mut result: Vec<String> = Vec::new();
        queue.push_back(name.to_string());

        while let Some(current) = queue.pop_front() {
            if let Some(dependents) = self.dependents.get(&current) {
                let mut dependents: Vec<&String> = dependents.iter().collect();
                dependents.sort();
                for dependent in dependents {
                    if visited.insert(dependent.clone()) {
                        result.push(dependent.clone());
                        queue.push_back(dependent.clone());
                    }
                }
            }
        }
        result
    }

    pub fn stats(&self) -> GraphStats {
        let nodes = self.dependencies.len();
        let edges = self.dependencies.values().map(HashSet::len).sum();
        let roots = self
            .dependencies
            .values()
            .filter(|deps| deps.is_empty())
            .count();
        let leaves = self
            .dependencies
            .keys()
            .filter(|node| {
                self.dependents
                    .get(node.as_str())
                    .map_or(true, HashSet::is_empty)
            })
            .count();
        GraphStats {
            nodes,
            edges,
            roots,
            leaves,
        }
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Empty both adjacency views.
    pub fn clear(&mut self) {
        self.dependencies.clear();
        self.dependents.clear();
        debug!("dependency graph cleared");
    }
}

impl fmt::Display for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        write!(
            f,
            "DependencyGraph(nodes={}, edges={}, roots={})",
            stats.nodes, stats.edges, stats.roots
        )
    }
}
