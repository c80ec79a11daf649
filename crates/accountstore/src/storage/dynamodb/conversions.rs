//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and domain types.
//! These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use accountstore_core::account::{fields, AccountRecord};
use accountstore_core::storage::{BackendError, ENTITY_TYPE, PARTITION_KEY};
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

use super::keys;

/// Attribute of an email claim pointing at the account that owns the email.
pub const CLAIM_ACCOUNT_ID: &str = "account_id";

// ============================================================================
// Account conversions
// ============================================================================

/// Convert an AccountRecord to DynamoDB item.
pub fn record_to_item(record: &AccountRecord) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();

    // Keys
    item.insert(
        PARTITION_KEY.to_string(),
        AttributeValue::S(keys::account_pk(record.id)),
    );

    // Entity type
    item.insert(
        ENTITY_TYPE.to_string(),
        AttributeValue::S(keys::ENTITY_TYPE_ACCOUNT.to_string()),
    );

    // Extra attributes first so the fixed schema always wins
    for (name, value) in &record.extra {
        item.insert(name.clone(), json_to_attribute(value));
    }

    // Data
    item.insert(
        fields::ID.to_string(),
        AttributeValue::S(record.id.to_string()),
    );
    item.insert(
        fields::USERNAME.to_string(),
        AttributeValue::S(record.username.clone()),
    );
    item.insert(
        fields::EMAIL.to_string(),
        AttributeValue::S(record.email.clone()),
    );
    item.insert(
        fields::CREDENTIAL_HASH.to_string(),
        AttributeValue::S(record.credential_hash.clone()),
    );
    item.insert(
        fields::CREATED_AT.to_string(),
        AttributeValue::S(record.created_at.to_rfc3339()),
    );
    item.insert(
        fields::UPDATED_AT.to_string(),
        AttributeValue::S(record.updated_at.to_rfc3339()),
    );
    item.insert(
        fields::VERIFIED.to_string(),
        AttributeValue::Bool(record.verified),
    );
    item.insert(fields::ACTIVE.to_string(), AttributeValue::Bool(record.active));
    item.insert(
        fields::LOGIN_COUNT.to_string(),
        AttributeValue::N(record.login_count.to_string()),
    );
    item.insert(
        fields::LAST_LOGIN.to_string(),
        match record.last_login {
            Some(at) => AttributeValue::S(at.to_rfc3339()),
            None => AttributeValue::Null(true),
        },
    );
    item.insert(
        fields::PROFILE_DATA.to_string(),
        json_to_attribute(&record.profile_data),
    );

    item
}

/// Convert a DynamoDB item to AccountRecord.
///
/// Attributes outside the fixed schema land in `extra`; the storage layout's
/// own attributes are dropped.
pub fn item_to_record(
    item: &HashMap<String, AttributeValue>,
) -> Result<AccountRecord, BackendError> {
    let mut extra = Map::new();
    for (name, value) in item {
        let name = name.as_str();
        if name == PARTITION_KEY || name == ENTITY_TYPE || fields::KNOWN.contains(&name) {
            continue;
        }
        extra.insert(name.to_string(), attribute_to_json(value)?);
    }

    Ok(AccountRecord {
        id: get_uuid(item, fields::ID)?,
        username: get_string(item, fields::USERNAME)?,
        email: get_string(item, fields::EMAIL)?,
        credential_hash: get_string(item, fields::CREDENTIAL_HASH)?,
        created_at: get_datetime(item, fields::CREATED_AT)?,
        updated_at: get_datetime(item, fields::UPDATED_AT)?,
        verified: get_bool(item, fields::VERIFIED)?,
        active: get_bool(item, fields::ACTIVE)?,
        login_count: get_u64(item, fields::LOGIN_COUNT)?,
        last_login: get_optional_datetime(item, fields::LAST_LOGIN)?,
        profile_data: match item.get(fields::PROFILE_DATA) {
            Some(value) => attribute_to_json(value)?,
            None => Value::Null,
        },
        extra,
    })
}

/// Build the item that reserves `email` for `account_id`.
///
/// Claims carry no `email` attribute so they stay out of the email index.
pub fn email_claim_item(
    email: &str,
    account_id: Uuid,
    created_at: DateTime<Utc>,
) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            PARTITION_KEY.to_string(),
            AttributeValue::S(keys::email_claim_pk(email)),
        ),
        (
            ENTITY_TYPE.to_string(),
            AttributeValue::S(keys::ENTITY_TYPE_EMAIL_CLAIM.to_string()),
        ),
        (
            CLAIM_ACCOUNT_ID.to_string(),
            AttributeValue::S(account_id.to_string()),
        ),
        (
            fields::CREATED_AT.to_string(),
            AttributeValue::S(created_at.to_rfc3339()),
        ),
    ])
}

/// Read the account an email claim points at.
pub fn claim_owner(item: &HashMap<String, AttributeValue>) -> Result<Uuid, BackendError> {
    get_uuid(item, CLAIM_ACCOUNT_ID)
}

// ============================================================================
// Document conversions
// ============================================================================

/// Convert a JSON value into the equivalent DynamoDB document value.
pub fn json_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(json_to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_attribute(v)))
                .collect(),
        ),
    }
}

/// Convert a DynamoDB value back into JSON.
///
/// String and number sets become arrays. Binary values are not part of the
/// account document model and are rejected.
pub fn attribute_to_json(value: &AttributeValue) -> Result<Value, BackendError> {
    match value {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::N(n) => parse_number(n),
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::L(values) => values
            .iter()
            .map(attribute_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(map) => map
            .iter()
            .map(|(k, v)| Ok((k.clone(), attribute_to_json(v)?)))
            .collect::<Result<Map<_, _>, BackendError>>()
            .map(Value::Object),
        AttributeValue::Ss(values) => Ok(Value::Array(
            values.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(values) => values
            .iter()
            .map(|n| parse_number(n))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Err(BackendError::InvalidData(format!(
            "Unsupported attribute type: {:?}",
            other
        ))),
    }
}

fn parse_number(n: &str) -> Result<Value, BackendError> {
    if let Ok(i) = n.parse::<i64>() {
        return Ok(Value::from(i));
    }
    if let Ok(u) = n.parse::<u64>() {
        return Ok(Value::from(u));
    }
    n.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| BackendError::InvalidData(format!("Invalid number: {}", n)))
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get a required string attribute.
fn get_string(item: &HashMap<String, AttributeValue>, key: &str) -> Result<String, BackendError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| BackendError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get a required boolean attribute.
fn get_bool(item: &HashMap<String, AttributeValue>, key: &str) -> Result<bool, BackendError> {
    item.get(key)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .ok_or_else(|| BackendError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get a required non-negative integer attribute.
fn get_u64(item: &HashMap<String, AttributeValue>, key: &str) -> Result<u64, BackendError> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| BackendError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get a required UUID attribute.
fn get_uuid(item: &HashMap<String, AttributeValue>, key: &str) -> Result<Uuid, BackendError> {
    let s = get_string(item, key)?;
    Uuid::parse_str(&s)
        .map_err(|e| BackendError::InvalidData(format!("Invalid UUID {}: {}", key, e)))
}

/// Get a required datetime attribute (RFC 3339 format).
fn get_datetime(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<DateTime<Utc>, BackendError> {
    let s = get_string(item, key)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| BackendError::InvalidData(format!("Invalid datetime {}: {}", key, e)))
}

/// Get an optional datetime attribute. Missing and NULL both mean `None`.
fn get_optional_datetime(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<Option<DateTime<Utc>>, BackendError> {
    match item.get(key) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(_) => get_datetime(item, key).map(Some),
    }
}
