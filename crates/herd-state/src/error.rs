/// Errors from world-state operations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Keys must be non-empty strings.
    #[error("key must not be an empty string")]
    EmptyKey,

    /// The backend cannot serve requests (lock poisoned, connection lost).
    #[error("world state unavailable: {0}")]
    Unavailable(String),

    /// A range iterator failed while producing entries.
    #[error("range iterator error: {0}")]
    Iterator(String),

    /// A persisted snapshot could not be read or written.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for world-state operations.
pub type StateResult<T> = Result<T, StateError>;
