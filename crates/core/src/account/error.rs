use thiserror::Error;

use crate::storage::BackendError;

/// Errors returned by account store operations.
///
/// This is the only error type that crosses the store boundary; backend
/// errors are translated into one of these variants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("An account with email {email} already exists")]
    DuplicateEmail { email: String },
    #[error("Account not found: {key}")]
    NotFound { key: String },
    #[error("Account is deactivated")]
    Deactivated,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("No updatable fields supplied")]
    NoFieldsToUpdate,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("Operation timed out")]
    Timeout,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AccountError::DuplicateEmail { .. } => "duplicate_email",
            AccountError::NotFound { .. } => "not_found",
            AccountError::Deactivated => "deactivated",
            AccountError::InvalidCredentials => "invalid_credentials",
            AccountError::NoFieldsToUpdate => "no_fields_to_update",
            AccountError::InvalidInput(_) => "invalid_input",
            AccountError::BackendUnavailable(_) => "backend_unavailable",
            AccountError::Timeout => "timeout",
            AccountError::Internal(_) => "internal_error",
        }
    }
}

/// Default translation of backend errors.
///
/// Operations that give a backend outcome a specific meaning (a failed
/// conditional put during create, for instance) match on the error before
/// falling back to this.
impl From<BackendError> for AccountError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound { id } => AccountError::NotFound { key: id },
            BackendError::ConnectionFailed(msg) | BackendError::Throttled(msg) => {
                AccountError::BackendUnavailable(msg)
            }
            BackendError::Timeout => AccountError::Timeout,
            BackendError::ConditionFailed => {
                AccountError::Internal("unexpected conditional write failure".to_string())
            }
            BackendError::QueryFailed(msg) | BackendError::InvalidData(msg) => {
                AccountError::Internal(msg)
            }
        }
    }
}

/// Result type for account store operations.
pub type Result<T> = std::result::Result<T, AccountError>;
