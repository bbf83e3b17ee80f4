//! This module contains the error types for the persistence layer.

use thiserror::Error;

/// Errors that can occur in the persistence layer.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// A filesystem operation failed.
    #[error("A data store operation failed: {0}")]
    OperationFailed(#[from] std::io::Error),

    /// An error occurred during serialization or deserialization.
    #[error("Failed to serialize or deserialize data: {0}")]
    SerializationError(#[from] serde_json::Error),
}
