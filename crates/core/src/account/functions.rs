use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::storage::{RecordUpdate, ENTITY_TYPE, PARTITION_KEY};

use super::{fields, AccountError};

/// Normalize an email for storage and comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check the required create parameters are present.
pub fn validate_new_account(
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), AccountError> {
    let required = [("username", username), ("email", email), ("password", password)];
    let missing: Vec<&str> = required
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AccountError::InvalidInput(format!(
            "missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Whether an update may never write `name`.
///
/// Covers the immutable account attributes and the storage layout's own
/// attributes.
pub fn is_protected_field(name: &str) -> bool {
    fields::IMMUTABLE.contains(&name) || name == PARTITION_KEY || name == ENTITY_TYPE
}

/// Turn caller-supplied update fields into a backend update.
///
/// Protected attributes are dropped silently. Known attributes are
/// type-checked and normalized, and `updated_at` is always set to `now`.
pub fn sanitize_update(
    fields_in: Map<String, Value>,
    now: DateTime<Utc>,
) -> Result<RecordUpdate, AccountError> {
    let mut update = RecordUpdate::new();

    for (name, value) in fields_in {
        if is_protected_field(&name) {
            tracing::debug!(field = %name, "Dropping protected field from update");
            continue;
        }
        if name.is_empty() {
            return Err(AccountError::InvalidInput(
                "field names must not be empty".to_string(),
            ));
        }
        let value = normalize_field(&name, value).map_err(AccountError::InvalidInput)?;
        update = update.set(name, value);
    }

    if update.is_empty() {
        return Err(AccountError::NoFieldsToUpdate);
    }

    Ok(update.set(fields::UPDATED_AT, Value::String(now.to_rfc3339())))
}

/// Type-check one update value against its attribute.
fn normalize_field(name: &str, value: Value) -> Result<Value, String> {
    match name {
        fields::USERNAME => match value {
            Value::String(s) if !s.trim().is_empty() => Ok(Value::String(s)),
            _ => Err(format!("{name} must be a non-empty string")),
        },
        fields::EMAIL => match value {
            Value::String(s) if !s.trim().is_empty() => Ok(Value::String(normalize_email(&s))),
            _ => Err(format!("{name} must be a non-empty string")),
        },
        fields::VERIFIED | fields::ACTIVE => match value {
            Value::Bool(_) => Ok(value),
            _ => Err(format!("{name} must be a boolean")),
        },
        fields::LOGIN_COUNT => match value.as_u64() {
            Some(_) => Ok(value),
            None => Err(format!("{name} must be a non-negative integer")),
        },
        fields::LAST_LOGIN | fields::UPDATED_AT => {
            let valid = match &value {
                Value::Null => name == fields::LAST_LOGIN,
                Value::String(s) => DateTime::parse_from_rfc3339(s).is_ok(),
                _ => false,
            };
            if valid {
                Ok(value)
            } else {
                Err(format!("{name} must be an RFC 3339 timestamp"))
            }
        }
        _ => Ok(value),
    }
}
