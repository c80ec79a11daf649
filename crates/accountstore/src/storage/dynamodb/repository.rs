//! DynamoDB repository implementation.
//!
//! Implements [`RecordBackend`] on a single table keyed by `pk`, with the
//! `email-index` global secondary index on `email`.

use std::collections::HashMap;

use accountstore_core::account::{fields, AccountRecord};
use accountstore_core::storage::{
    BackendError, RecordBackend, RecordUpdate, Result, TableSchema, TableStats, TableStatus,
    EMAIL_INDEX, ENTITY_TYPE, PARTITION_KEY,
};
use async_trait::async_trait;
use aws_sdk_dynamodb::types::{
    AttributeValue, KeyType, Put, ReturnValue, TableDescription, TableStatus as AwsTableStatus,
    TransactWriteItem,
};
use aws_sdk_dynamodb::Client;
use chrono::Utc;
use uuid::Uuid;

use super::conversions::{
    claim_owner, email_claim_item, item_to_record, record_to_item, CLAIM_ACCOUNT_ID,
};
use super::error::{
    map_describe_table_error, map_get_item_error, map_query_error, map_scan_error,
    map_transact_write_error, map_update_item_error,
};
use super::expression::build_update_expression;
use super::keys;

/// Condition shared by every put that must not overwrite an existing item.
const PK_NOT_EXISTS: &str = "attribute_not_exists(#pk)";

/// DynamoDB-based repository implementation.
pub struct DynamoDbRepository {
    client: Client,
    table_name: String,
}

impl DynamoDbRepository {
    /// Creates a new repository with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Builds a put that only succeeds when no item with the same key exists.
    fn put_if_absent(&self, item: HashMap<String, AttributeValue>) -> Result<TransactWriteItem> {
        let put = Put::builder()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression(PK_NOT_EXISTS)
            .expression_attribute_names("#pk", PARTITION_KEY)
            .build()
            .map_err(|e| BackendError::QueryFailed(format!("Invalid put request: {}", e)))?;

        Ok(TransactWriteItem::builder().put(put).build())
    }

    /// Builds a claim put that replaces a claim still owned by `previous_owner`.
    fn put_claim_over(
        &self,
        item: HashMap<String, AttributeValue>,
        previous_owner: Uuid,
    ) -> Result<TransactWriteItem> {
        let put = Put::builder()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("#owner = :owner")
            .expression_attribute_names("#owner", CLAIM_ACCOUNT_ID)
            .expression_attribute_values(
                ":owner",
                AttributeValue::S(previous_owner.to_string()),
            )
            .build()
            .map_err(|e| BackendError::QueryFailed(format!("Invalid put request: {}", e)))?;

        Ok(TransactWriteItem::builder().put(put).build())
    }

    /// Writes the account and its email claim in one transaction.
    ///
    /// With `previous_owner` the claim may replace one held by that account;
    /// otherwise the claim must not exist yet.
    async fn write_with_claim(
        &self,
        record: &AccountRecord,
        previous_owner: Option<Uuid>,
    ) -> Result<()> {
        let claim_item = email_claim_item(&record.email, record.id, Utc::now());
        let claim = match previous_owner {
            Some(owner) => self.put_claim_over(claim_item, owner)?,
            None => self.put_if_absent(claim_item)?,
        };
        let account = self.put_if_absent(record_to_item(record))?;

        self.client
            .transact_write_items()
            .transact_items(claim)
            .transact_items(account)
            .send()
            .await
            .map_err(map_transact_write_error)?;

        Ok(())
    }

    /// The account currently holding the claim on `email`, if any.
    async fn claim_holder(&self, email: &str) -> Result<Option<Uuid>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(PARTITION_KEY, AttributeValue::S(keys::email_claim_pk(email)))
            .consistent_read(true)
            .send()
            .await
            .map_err(map_get_item_error)?;

        result.item.as_ref().map(claim_owner).transpose()
    }

    async fn describe_table(&self) -> Result<TableDescription> {
        let response = self
            .client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|e| map_describe_table_error(e, &self.table_name))?;

        response
            .table
            .ok_or_else(|| BackendError::InvalidData("DescribeTable returned no table".to_string()))
    }
}

#[async_trait]
impl RecordBackend for DynamoDbRepository {
    async fn get(&self, id: Uuid) -> Result<Option<AccountRecord>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(PARTITION_KEY, AttributeValue::S(keys::account_pk(id)))
            .consistent_read(true)
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => Ok(Some(item_to_record(&item)?)),
            None => Ok(None),
        }
    }

    async fn put_if_email_absent(&self, record: &AccountRecord) -> Result<()> {
        // The claim item keyed by the email is what makes the uniqueness check
        // atomic; both items are written or neither is.
        match self.write_with_claim(record, None).await {
            Err(BackendError::ConditionFailed) => {}
            other => return other,
        }

        // Claims are not moved when an account changes its email, so the
        // claim may belong to an account that no longer has this address.
        let Some(owner) = self.claim_holder(&record.email).await? else {
            return self.write_with_claim(record, None).await;
        };
        if owner == record.id {
            return Err(BackendError::ConditionFailed);
        }

        let holder = self.get(owner).await?;
        if !claim_is_stale(holder.as_ref(), &record.email) {
            return Err(BackendError::ConditionFailed);
        }

        tracing::info!(
            email = %record.email,
            previous_owner = %owner,
            account_id = %record.id,
            "Taking over stale email claim"
        );
        self.write_with_claim(record, Some(owner)).await
    }

    async fn update_if_exists(&self, id: Uuid, update: &RecordUpdate) -> Result<AccountRecord> {
        if update.is_empty() {
            return Err(BackendError::InvalidData(
                "Update has no attributes".to_string(),
            ));
        }

        let expr = build_update_expression(update);

        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(PARTITION_KEY, AttributeValue::S(keys::account_pk(id)))
            .update_expression(expr.update)
            .condition_expression(expr.condition)
            .set_expression_attribute_names(Some(expr.names))
            .set_expression_attribute_values(Some(expr.values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| map_update_item_error(e, id.to_string()))?;

        let item = result.attributes.ok_or_else(|| {
            BackendError::InvalidData("UpdateItem returned no attributes".to_string())
        })?;
        item_to_record(&item)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(EMAIL_INDEX)
            .key_condition_expression("#email = :email")
            .expression_attribute_names("#email", fields::EMAIL)
            .expression_attribute_values(":email", AttributeValue::S(email.to_string()))
            .send()
            .await
            .map_err(map_query_error)?;

        match result.items().first() {
            Some(item) => Ok(Some(item_to_record(item)?)),
            None => Ok(None),
        }
    }

    async fn scan(&self, active_only: bool) -> Result<Vec<AccountRecord>> {
        let mut filter = "#et = :account".to_string();
        let mut names = HashMap::from([("#et".to_string(), ENTITY_TYPE.to_string())]);
        let mut values = HashMap::from([(
            ":account".to_string(),
            AttributeValue::S(keys::ENTITY_TYPE_ACCOUNT.to_string()),
        )]);
        if active_only {
            filter.push_str(" AND #active = :active");
            names.insert("#active".to_string(), fields::ACTIVE.to_string());
            values.insert(":active".to_string(), AttributeValue::Bool(true));
        }

        let mut records = Vec::new();
        let mut start_key = None;
        loop {
            let page = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression(&filter)
                .set_expression_attribute_names(Some(names.clone()))
                .set_expression_attribute_values(Some(values.clone()))
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(map_scan_error)?;

            for item in page.items() {
                records.push(item_to_record(item)?);
            }

            match page.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        tracing::debug!(count = records.len(), active_only, "Scanned accounts table");
        Ok(records)
    }

    async fn describe(&self) -> Result<TableStats> {
        let table = self.describe_table().await?;

        Ok(TableStats {
            table_name: self.table_name.clone(),
            status: table_status(table.table_status()),
            item_count: table.item_count().unwrap_or_default(),
            size_bytes: table.table_size_bytes().unwrap_or_default(),
        })
    }

    async fn describe_schema(&self) -> Result<TableSchema> {
        let table = self.describe_table().await?;

        let partition_key = table
            .key_schema()
            .iter()
            .find(|element| element.key_type() == &KeyType::Hash)
            .map(|element| element.attribute_name().to_string());

        let indexes = table
            .global_secondary_indexes()
            .iter()
            .filter_map(|gsi| gsi.index_name())
            .map(str::to_string)
            .collect();

        Ok(TableSchema {
            table_name: self.table_name.clone(),
            status: table_status(table.table_status()),
            partition_key,
            indexes,
        })
    }
}

/// A claim is stale once its holder is gone or holds another email.
fn claim_is_stale(holder: Option<&AccountRecord>, email: &str) -> bool {
    holder.map_or(true, |account| account.email != email)
}

fn table_status(status: Option<&AwsTableStatus>) -> TableStatus {
    match status {
        Some(AwsTableStatus::Active) => TableStatus::Active,
        Some(AwsTableStatus::Creating) => TableStatus::Creating,
        Some(AwsTableStatus::Updating) => TableStatus::Updating,
        Some(AwsTableStatus::Deleting) => TableStatus::Deleting,
        _ => TableStatus::Unknown,
    }
}
