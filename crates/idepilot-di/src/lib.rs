//! Dependency graph and service order resolution for IdePilot
//!
//! This crate is the bootstrap core of the IdePilot backend: services are
//! declared by name with their dependency names and an architectural category
//! (infrastructure, repositories, external, strategies, domain, application,
//! handlers), and the resolver produces a registration plan — a topologically
//! valid construction order grouped by category. The registry then invokes
//! each service's factory in plan order, tolerating individual construction
//! failures.
//!
//! ## Quick Start
//!
//! ```rust
//! use idepilot_di::resolver::ServiceOrderResolver;
//!
//! let mut resolver = ServiceOrderResolver::new();
//! resolver.set_category_order(&["infrastructure", "domain"]);
//! resolver.add_service("event_bus", &[], "infrastructure");
//! resolver.add_service("project_service", &["event_bus"], "domain");
//!
//! let resolved = resolver.resolve_order().unwrap();
//! assert_eq!(resolved.ordered_services[0], "event_bus");
//! assert_eq!(resolved.registration_plan[0].category, "infrastructure");
//! ```

pub mod container;
pub mod error;
pub mod graph;
pub mod registry;
pub mod resolver;

pub use container::{BoxedService, ServiceContainer};
pub use error::{DiError, DiResult};
pub use graph::{DependencyGraph, GraphStats, SortMode, ValidationReport};
pub use registry::{
    BootstrapReport, FailedService, PostInitFuture, ResolvedDependencies, ServiceDefinition,
    ServiceFuture, ServiceRegistry,
};
pub use resolver::{
    RegistrationCheck, RegistrationGroup, ResolvedOrder, ServiceOrderResolver, ServiceStats,
};
