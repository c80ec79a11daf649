//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use accountstore_core::account::{Account, AccountRecord};
use accountstore_core::storage::{
    BackendError, RecordBackend, RecordUpdate, Result, TableSchema, TableStats, TableStatus,
    EMAIL_INDEX, PARTITION_KEY,
};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Name reported for the in-memory table.
const TABLE_NAME: &str = "in-memory";

/// In-memory storage backend.
///
/// Data is not persisted and will be lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    records: Arc<RwLock<HashMap<Uuid, AccountRecord>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Rough serialized size of a record, standing in for DynamoDB's estimate.
fn approximate_size(record: &AccountRecord) -> i64 {
    let public = serde_json::to_vec(&Account::from(record.clone()))
        .map(|bytes| bytes.len())
        .unwrap_or_default();
    (public + record.credential_hash.len()) as i64
}

#[async_trait]
impl RecordBackend for InMemoryRepository {
    async fn get(&self, id: Uuid) -> Result<Option<AccountRecord>> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn put_if_email_absent(&self, record: &AccountRecord) -> Result<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id)
            || records.values().any(|existing| existing.email == record.email)
        {
            return Err(BackendError::ConditionFailed);
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn update_if_exists(&self, id: Uuid, update: &RecordUpdate) -> Result<AccountRecord> {
        let mut records = self.records.write().await;
        let current = records
            .get(&id)
            .ok_or_else(|| BackendError::NotFound { id: id.to_string() })?;

        // Apply to a copy so a rejected value leaves the stored record untouched.
        let mut updated = current.clone();
        updated.apply(update)?;
        records.insert(id, updated.clone());
        Ok(updated)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>> {
        let records = self.records.read().await;
        Ok(records.values().find(|r| r.email == email).cloned())
    }

    async fn scan(&self, active_only: bool) -> Result<Vec<AccountRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| !active_only || r.active)
            .cloned()
            .collect())
    }

    async fn describe(&self) -> Result<TableStats> {
        let records = self.records.read().await;
        Ok(TableStats {
            table_name: TABLE_NAME.to_string(),
            status: TableStatus::Active,
            item_count: records.len() as i64,
            size_bytes: records.values().map(approximate_size).sum(),
        })
    }

    async fn describe_schema(&self) -> Result<TableSchema> {
        Ok(TableSchema {
            table_name: TABLE_NAME.to_string(),
            status: TableStatus::Active,
            partition_key: Some(PARTITION_KEY.to_string()),
            indexes: vec![EMAIL_INDEX.to_string()],
        })
    }
}
