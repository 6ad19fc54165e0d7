//! Error types for the dependency-resolution core

use std::collections::HashMap;

use thiserror::Error;

/// Result type for dependency-resolution operations
pub type DiResult<T> = Result<T, DiError>;

/// Errors that can occur while resolving or constructing services
#[derive(Debug, Error)]
pub enum DiError {
    /// One or more services reference dependencies that were never declared
    #[error("Missing dependencies: {missing:?}")]
    MissingDependencies {
        /// Service name to the dependency names it references but which were
        /// never added as nodes
        missing: HashMap<String, Vec<String>>,
    },

    /// The graph contains at least one dependency cycle
    #[error("Circular dependencies detected: {cycles:?}")]
    CircularDependencies {
        /// Each cycle as an ordered node list, closed by repeating the first node
        cycles: Vec<Vec<String>>,
    },

    /// Kahn's algorithm terminated without processing every node
    #[error("Topological sort left nodes unprocessed: {unprocessed:?}")]
    IncompleteSort { unprocessed: Vec<String> },

    /// Lookup for a service name that is not in the container
    #[error("Service not registered: {name}")]
    ServiceNotRegistered { name: String },

    /// The stored service could not be downcast to the requested type
    #[error("Service '{name}' has an unexpected type")]
    InvalidServiceType { name: String },

    /// A service factory returned an error during registration
    #[error("Service '{name}' failed to construct: {message}")]
    ConstructionFailed { name: String, message: String },

    /// The same service name was declared more than once
    #[error("Service '{name}' declared more than once")]
    DuplicateDefinition { name: String },
}
