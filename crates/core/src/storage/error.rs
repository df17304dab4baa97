use thiserror::Error;

/// Errors reported by a [`NoteStore`](super::NoteStore) implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Throttled: {0}")]
    Throttled(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// Whether repeating the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Throttled(_) | StoreError::Unavailable(_))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
