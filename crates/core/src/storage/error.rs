use thiserror::Error;

/// Errors reported by a [`RecordBackend`](super::RecordBackend).
///
/// Backend implementations translate their driver errors into this enum so
/// nothing driver-specific leaks past the storage layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Conditional write rejected")]
    ConditionFailed,
    #[error("Record not found: {id}")]
    NotFound { id: String },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Throttled: {0}")]
    Throttled(String),
    #[error("Backend call timed out")]
    Timeout,
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;
