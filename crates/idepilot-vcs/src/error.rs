//! Error types for VCS operations

use thiserror::Error;

/// Result type for VCS operations
pub type VcsResult<T> = Result<T, VcsError>;

/// Errors that can occur while reading the working copy
#[derive(Debug, Error)]
pub enum VcsError {
    /// Git repository error
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// No repository was found at or above the path
    #[error("Repository not found at path: {path}")]
    RepositoryNotFound { path: String },

    /// The repository exists but is not in a usable state
    #[error("Invalid repository state: {message}")]
    InvalidState { message: String },
}
