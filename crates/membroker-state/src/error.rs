//! Error types for the membroker state store.

use thiserror::Error;

/// Result type alias for state and store operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur during state and store operations.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("instance not found: {0}")]
    InstanceNotFound(String),

    #[error("instance id is taken: {0}")]
    DuplicateInstance(String),

    #[error("no capacity left to provision instance: {0}")]
    CapacityExhausted(String),

    #[error("binding not found: {0}")]
    BindingNotFound(String),

    #[error("binding id is taken: {0}")]
    DuplicateBinding(String),

    #[error("state file i/o error: {0}")]
    Io(String),

    #[error("malformed state file: {0}")]
    Parse(String),
}
