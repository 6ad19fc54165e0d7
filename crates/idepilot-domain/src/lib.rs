//! IdePilot domain layer
//!
//! Entities for the automated project and its captured workspace context,
//! dashmap-backed in-memory repositories, and the domain services that keep
//! them in sync with the working copy and the filesystem.

pub mod entities;
pub mod error;
pub mod repository;
pub mod services;

pub use entities::{Project, WorkspaceSnapshot};
pub use error::{DomainError, DomainResult};
pub use repository::{InMemoryRepository, ProjectRepository, SnapshotRepository};
pub use services::{ContextService, ProjectService};
