//! Error types for workspace scanning

use thiserror::Error;

/// Result type for scanning operations
pub type FilesResult<T> = Result<T, FilesError>;

/// Errors that can occur while scanning the workspace
#[derive(Debug, Error)]
pub enum FilesError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid glob pattern in a scan profile
    #[error("Invalid scan pattern: {0}")]
    Pattern(#[from] globset::Error),

    /// Directory walk error
    #[error("Workspace walk failed: {0}")]
    Walk(#[from] ignore::Error),
}
