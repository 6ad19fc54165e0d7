//! Error types for IDE debug-port operations

use thiserror::Error;

/// Result type for IDE connection operations
pub type IdeResult<T> = Result<T, IdeError>;

/// Errors that can occur while talking to the IDE's debugging port
#[derive(Debug, Error)]
pub enum IdeError {
    /// HTTP transport error against the debug endpoint
    #[error("Debug port request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered but not with what a debug port should return
    #[error("Unexpected debug endpoint response: {message}")]
    UnexpectedResponse { message: String },

    /// No attachable workbench page is exposed on the debug port
    #[error("No attachable workbench target found")]
    NoWorkbenchTarget,
}
