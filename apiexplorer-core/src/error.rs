//! Core error types for `ApiExplorer`.

use thiserror::Error;

/// Core error type for `ApiExplorer` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data did not have the shape an operation needs.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Unknown auth strategy name.
    #[error("Unknown auth strategy: {0}")]
    UnknownStrategy(String),

    /// Persistence backend failed.
    #[error("Storage error: {0}")]
    Storage(String),
}
