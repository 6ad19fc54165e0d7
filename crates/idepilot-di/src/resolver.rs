//! Category-aware service order resolution
//!
//! [`ServiceOrderResolver`] wraps a [`DependencyGraph`], attaches a category
//! label to each service, and turns the flat topological order into a
//! registration plan grouped by architectural layer. Grouping exists because
//! a topological order alone is not deterministic when several valid
//! linearizations exist; the category sequence pins a human-auditable one.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use tracing::{debug, error};

use crate::error::{DiError, DiResult};
use crate::graph::{DependencyGraph, GraphStats, SortMode};

/// Label attached to services added without a meaningful category.
const UNCATEGORIZED: &str = "uncategorized";

/// One category's slice of the registration plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationGroup {
    pub category: String,
    /// Member services in topological order
    pub services: Vec<String>,
    /// Distinct dependency names referenced by any member, for diagnostics
    pub dependencies: Vec<String>,
}

/// Successful output of [`ServiceOrderResolver::resolve_order`]
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedOrder {
    /// Full topological order over every known service
    pub ordered_services: Vec<String>,
    /// The same services grouped by category, groups in effective category order
    pub registration_plan: Vec<RegistrationGroup>,
    /// Effective category sequence: the configured preferred order followed by
    /// unlisted categories in first-seen order
    pub category_order: Vec<String>,
    pub stats: GraphStats,
}

/// Result of checking a single service against a partial registration history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationCheck {
    pub can_register: bool,
    pub missing_dependencies: Vec<String>,
    pub dependencies: Vec<String>,
}

/// Per-service introspection data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    pub name: String,
    pub category: String,
    pub dependency_count: usize,
    pub dependent_count: usize,
    pub transitive_dependent_count: usize,
}

/// Resolves the order in which named, categorized services should register
#[derive(Debug, Default)]
pub struct ServiceOrderResolver {
    graph: DependencyGraph,
    categories: HashMap<String, String>,
    /// Preferred category ordering, replaceable wholesale
    category_order: Vec<String>,
    /// Categories in first-seen order, the fallback for anything the
    /// preferred list does not mention
    seen_categories: Vec<String>,
}

impl ServiceOrderResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a service with its dependencies and category.
    ///
    /// Re-declaring a service merges its dependency set and overwrites its
    /// category. New categories are appended to the known list in first-seen
    /// order.
    pub fn add_service(&mut self, name: &str, dependencies: &[&str], category: &str) {
        self.graph.add_node(name, dependencies);
        self.categories
            .insert(name.to_string(), category.to_string());
        if !self.seen_categories.iter().any(|c| c == category) {
            self.seen_categories.push(category.to_string());
        }
        debug!(service = name, category, "service declared");
    }

    /// Replace the preferred category ordering wholesale.
    pub fn set_category_order(&mut self, categories: &[&str]) {
        self.category_order = categories.iter().map(|c| (*c).to_string()).collect();
    }

    /// Validate, detect cycles, sort, and group.
    ///
    /// Referential integrity is always checked before sorting; dangling
    /// dependency references fail resolution rather than silently dropping
    /// services. Failures are returned as values, never panics.
    pub fn resolve_order(&self) -> DiResult<ResolvedOrder> {
        let report = self.graph.validate();
        if !report.is_valid {
            return Err(DiError::MissingDependencies {
                missing: report.missing_dependencies,
            });
        }

        let cycles = self.graph.detect_cycles();
        if !cycles.is_empty() {
            return Err(DiError::CircularDependencies { cycles });
        }

        let ordered_services = self.graph.topological_sort(SortMode::Strict)?;

        // Per-category buckets, preserving topological order within each.
        let mut buckets: HashMap<String, Vec<String>> = HashMap::new();
        for service in &ordered_services {
            let category = self
                .categories
                .get(service)
                .map(String::as_str)
                .unwrap_or(UNCATEGORIZED);
            buckets
                .entry(category.to_string())
                .or_default()
                .push(service.clone());
        }

        let category_order = self.effective_category_order(&buckets);

        let mut registration_plan = Vec::new();
        for category in &category_order {
            let Some(services) = buckets.get(category) else {
                continue;
            };
            let mut referenced: BTreeSet<String> = BTreeSet::new();
            for service in services {
                referenced.extend(self.graph.dependencies_of(service));
            }
            registration_plan.push(RegistrationGroup {
                category: category.clone(),
                services: services.clone(),
                dependencies: referenced.into_iter().collect(),
            });
        }

        debug!(
            services = ordered_services.len(),
            groups = registration_plan.len(),
            "service order resolved"
        );

        Ok(ResolvedOrder {
            ordered_services,
            registration_plan,
            category_order,
            stats: self.graph.stats(),
        })
    }

    /// The configured preferred order, then any categories it does not
    /// mention in first-seen order.
    fn effective_category_order(&self, buckets: &HashMap<String, Vec<String>>) -> Vec<String> {
        let mut effective = self.category_order.clone();
        for category in &self.seen_categories {
            if !effective.iter().any(|c| c == category) {
                effective.push(category.clone());
            }
        }
        if buckets.contains_key(UNCATEGORIZED) && !effective.iter().any(|c| c == UNCATEGORIZED) {
            effective.push(UNCATEGORIZED.to_string());
        }
        effective
    }

    /// Whether `name` could register now, given the services registered so far.
    pub fn check_registration(
        &self,
        name: &str,
        registered: &HashSet<String>,
    ) -> RegistrationCheck {
        let mut dependencies: Vec<String> =
            self.graph.dependencies_of(name).into_iter().collect();
        dependencies.sort();
        let missing_dependencies: Vec<String> = dependencies
            .iter()
            .filter(|dep| !registered.contains(dep.as_str()))
            .cloned()
            .collect();
        RegistrationCheck {
            can_register: missing_dependencies.is_empty(),
            missing_dependencies,
            dependencies,
        }
    }

    /// Every known service whose dependencies are all satisfied but which is
    /// not itself registered yet. Supports incremental registration flows
    /// where no single global order is enforced.
    pub fn ready_services(&self, registered: &HashSet<String>) -> Vec<String> {
        let mut ready: Vec<String> = self
            .categories
            .keys()
            .filter(|name| !registered.contains(name.as_str()))
            .filter(|name| {
                self.graph
                    .dependencies_of(name)
                    .iter()
                    .all(|dep| registered.contains(dep))
            })
            .cloned()
            .collect();
        ready.sort();
        ready
    }

    /// All-or-nothing resolution: the flat registration order, or a loudly
    /// logged error for callers wanting fail-fast semantics.
    pub fn resolution_queue(&self) -> DiResult<Vec<String>> {
        match self.resolve_order() {
            Ok(resolved) => Ok(resolved
                .registration_plan
                .into_iter()
                .flat_map(|group| group.services)
                .collect()),
            Err(err) => {
                error!(error = %err, "service order resolution failed");
                Err(err)
            }
        }
    }

    /// Introspection data for one service; `None` for unknown names.
    pub fn service_stats(&self, name: &str) -> Option<ServiceStats> {
        if !self.graph.has_node(name) {
            return None;
        }
        Some(ServiceStats {
            name: name.to_string(),
            category: self
                .categories
                .get(name)
                .cloned()
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            dependency_count: self.graph.dependencies_of(name).len(),
            dependent_count: self.graph.dependents_of(name).len(),
            transitive_dependent_count: self.graph.transitive_dependents(name).len(),
        })
    }

    /// Names of every service declared in `category`, sorted.
    pub fn services_by_category(&self, category: &str) -> Vec<String> {
        let mut services: Vec<String> = self
            .categories
            .iter()
            .filter(|(_, c)| c.as_str() == category)
            .map(|(name, _)| name.clone())
            .collect();
        services.sort();
        services
    }

    /// Service counts per category, in effective category order.
    pub fn category_stats(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for category in self.categories.values() {
            *counts.entry(category.as_str()).or_insert(0) += 1;
        }
        self.effective_category_order(&HashMap::new())
            .into_iter()
            .filter_map(|category| {
                counts
                    .get(category.as_str())
                    .map(|count| (category.clone(), *count))
            })
            .collect()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn service_count(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Reset to an empty resolver; the preferred category order survives.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.categories.clear();
        self.seen_categories.clear();
        debug!("service order resolver cleared");
    }
}

impl fmt::Display for ServiceOrderResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ServiceOrderResolver(services={}, categories={})",
            self.categories.len(),
            self.seen_categories.len()
        )
    }
}
