use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Partition key attribute of the accounts table.
pub const PARTITION_KEY: &str = "pk";

/// Discriminator attribute separating account items from email claims.
pub const ENTITY_TYPE: &str = "entity_type";

/// Secondary index used to look accounts up by email.
pub const EMAIL_INDEX: &str = "email-index";

/// A partial update applied atomically to one record.
///
/// `set` overwrites attributes, `add` increments numeric attributes on the
/// backend side so concurrent writers never lose increments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordUpdate {
    pub set: BTreeMap<String, Value>,
    pub add: BTreeMap<String, i64>,
}

impl RecordUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite `name` with `value`.
    pub fn set(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set.insert(name.into(), value);
        self
    }

    /// Atomically add `delta` to the numeric attribute `name`.
    pub fn add(mut self, name: impl Into<String>, delta: i64) -> Self {
        self.add.insert(name.into(), delta);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.add.is_empty()
    }
}

/// Table lifecycle status as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Active,
    Creating,
    Updating,
    Deleting,
    Unknown,
}

/// Approximate table metadata.
///
/// Counts are the backend's periodically refreshed estimates, not exact
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableStats {
    pub table_name: String,
    pub status: TableStatus,
    pub item_count: i64,
    pub size_bytes: i64,
}

/// Observed table schema, used by health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table_name: String,
    pub status: TableStatus,
    pub partition_key: Option<String>,
    pub indexes: Vec<String>,
}

/// Pure function: list everything that prevents the store from using `schema`.
///
/// An empty result means the table is ready.
pub fn schema_problems(schema: &TableSchema) -> Vec<String> {
    let mut problems = Vec::new();

    if schema.status != TableStatus::Active {
        problems.push(format!(
            "table '{}' is not active ({:?})",
            schema.table_name, schema.status
        ));
    }

    match schema.partition_key.as_deref() {
        Some(PARTITION_KEY) => {}
        Some(other) => problems.push(format!(
            "partition key is '{other}', expected '{PARTITION_KEY}'"
        )),
        None => problems.push("partition key is missing".to_string()),
    }

    if !schema.indexes.iter().any(|name| name == EMAIL_INDEX) {
        problems.push(format!("index '{EMAIL_INDEX}' is missing"));
    }

    problems
}
