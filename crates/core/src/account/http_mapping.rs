//! Pure functions for mapping account errors to HTTP status codes.
//!
//! This module provides HTTP status code mappings for [`AccountError`] variants,
//! following the Functional Core pattern - pure functions with no side effects.

use super::AccountError;

/// Maps an [`AccountError`] to an HTTP status code.
///
/// - `InvalidInput`, `NoFieldsToUpdate` -> 400 (Bad Request)
/// - `InvalidCredentials` -> 401 (Unauthorized)
/// - `Deactivated` -> 403 (Forbidden)
/// - `NotFound` -> 404 (Not Found)
/// - `DuplicateEmail` -> 409 (Conflict)
/// - `Internal` -> 500 (Internal Server Error)
/// - `BackendUnavailable` -> 503 (Service Unavailable)
/// - `Timeout` -> 504 (Gateway Timeout)
///
/// # Examples
///
/// ```
/// use accountstore_core::account::{AccountError, account_error_to_status_code};
///
/// let error = AccountError::NotFound {
///     key: "abc-123".to_string(),
/// };
/// assert_eq!(account_error_to_status_code(&error), 404);
/// ```
pub fn account_error_to_status_code(error: &AccountError) -> u16 {
    match error {
        AccountError::InvalidInput(_) => 400,
        AccountError::NoFieldsToUpdate => 400,
        AccountError::InvalidCredentials => 401,
        AccountError::Deactivated => 403,
        AccountError::NotFound { .. } => 404,
        AccountError::DuplicateEmail { .. } => 409,
        AccountError::Internal(_) => 500,
        AccountError::BackendUnavailable(_) => 503,
        AccountError::Timeout => 504,
    }
}
