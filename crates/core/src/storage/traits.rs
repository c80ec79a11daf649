use async_trait::async_trait;
use uuid::Uuid;

use crate::account::AccountRecord;

use super::{RecordUpdate, Result, TableSchema, TableStats};

/// Durable record storage the account store is built on.
///
/// Every method maps onto a single backend call. Conditional writes must be
/// evaluated atomically by the backend.
#[async_trait]
pub trait RecordBackend: Send + Sync {
    /// Gets a record by its ID.
    async fn get(&self, id: Uuid) -> Result<Option<AccountRecord>>;

    /// Stores a new record unless another record already holds its email.
    ///
    /// Returns [`BackendError::ConditionFailed`](super::BackendError::ConditionFailed)
    /// when the email is taken.
    async fn put_if_email_absent(&self, record: &AccountRecord) -> Result<()>;

    /// Applies `update` to an existing record and returns the new state.
    ///
    /// Returns [`BackendError::NotFound`](super::BackendError::NotFound)
    /// without writing anything when no record has this ID.
    async fn update_if_exists(&self, id: Uuid, update: &RecordUpdate) -> Result<AccountRecord>;

    /// Looks a record up through the email index.
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>>;

    /// Reads every record, optionally only the active ones. Unordered.
    async fn scan(&self, active_only: bool) -> Result<Vec<AccountRecord>>;

    /// Approximate item count, size and status of the table.
    async fn describe(&self) -> Result<TableStats>;

    /// Key schema and indexes of the table.
    async fn describe_schema(&self) -> Result<TableSchema>;
}
