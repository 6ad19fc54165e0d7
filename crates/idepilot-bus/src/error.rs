//! Error types for bus operations

use thiserror::Error;

/// Result type for bus operations
pub type BusResult<T> = Result<T, BusError>;

/// Errors that can occur while dispatching over a bus
#[derive(Debug, Error)]
pub enum BusError {
    /// A handler is already registered under this name
    #[error("Handler already registered: {name}")]
    DuplicateHandler { name: String },

    /// No handler is registered under this name
    #[error("No handler registered: {name}")]
    HandlerNotFound { name: String },

    /// The handler ran but reported a failure
    #[error("Handler '{name}' failed: {message}")]
    HandlerFailed { name: String, message: String },

    /// Payload serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
