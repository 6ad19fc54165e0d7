//! Error types for domain services

use thiserror::Error;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors that can occur in domain services
#[derive(Debug, Error)]
pub enum DomainError {
    /// Working-copy read failed
    #[error(transparent)]
    Vcs(#[from] idepilot_vcs::VcsError),

    /// Workspace scan failed
    #[error(transparent)]
    Files(#[from] idepilot_files::FilesError),

    /// A referenced entity does not exist
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },
}
