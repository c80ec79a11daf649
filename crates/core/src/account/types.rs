use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::storage::{BackendError, RecordUpdate};

/// Attribute names of an account record, as stored by every backend.
pub mod fields {
    pub const ID: &str = "id";
    pub const USERNAME: &str = "username";
    pub const EMAIL: &str = "email";
    pub const CREDENTIAL_HASH: &str = "credential_hash";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";
    pub const VERIFIED: &str = "verified";
    pub const ACTIVE: &str = "active";
    pub const LOGIN_COUNT: &str = "login_count";
    pub const LAST_LOGIN: &str = "last_login";
    pub const PROFILE_DATA: &str = "profile_data";

    /// Attributes no update may touch.
    pub const IMMUTABLE: [&str; 3] = [ID, CREDENTIAL_HASH, CREATED_AT];

    /// Every attribute with a fixed meaning.
    pub const KNOWN: [&str; 11] = [
        ID,
        USERNAME,
        EMAIL,
        CREDENTIAL_HASH,
        CREATED_AT,
        UPDATED_AT,
        VERIFIED,
        ACTIVE,
        LOGIN_COUNT,
        LAST_LOGIN,
        PROFILE_DATA,
    ];
}

/// An account as persisted, credential hash included.
///
/// This type never leaves the store: callers only ever see [`Account`].
#[derive(Debug, Clone, PartialEq)]
pub struct AccountRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub credential_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub verified: bool,
    pub active: bool,
    pub login_count: u64,
    pub last_login: Option<DateTime<Utc>>,
    pub profile_data: Value,
    /// Attributes written through `update` that have no fixed meaning.
    pub extra: Map<String, Value>,
}

/// The public view of an account.
///
/// Has no credential hash field, so no serialized account can carry one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub verified: bool,
    pub active: bool,
    pub login_count: u64,
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub profile_data: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccountRecord {
    /// Creates a fresh, active, unverified record with a generated ID.
    ///
    /// `email` is stored as given; callers normalize it first.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        credential_hash: impl Into<String>,
        profile_data: Value,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            credential_hash: credential_hash.into(),
            created_at: now,
            updated_at: now,
            verified: false,
            active: true,
            login_count: 0,
            last_login: None,
            profile_data,
            extra: Map::new(),
        }
    }

    /// Drops the credential hash.
    pub fn into_public(self) -> Account {
        Account {
            id: self.id,
            username: self.username,
            email: self.email,
            created_at: self.created_at,
            updated_at: self.updated_at,
            verified: self.verified,
            active: self.active,
            login_count: self.login_count,
            last_login: self.last_login,
            profile_data: self.profile_data,
            extra: self.extra,
        }
    }

    /// Applies a partial update in place, the way a backend would.
    pub fn apply(&mut self, update: &RecordUpdate) -> Result<(), BackendError> {
        for (name, value) in &update.set {
            self.set_attribute(name, value.clone())?;
        }
        for (name, delta) in &update.add {
            self.add_to_attribute(name, *delta)?;
        }
        Ok(())
    }

    /// Overwrites one attribute, parsing known attributes into their types.
    pub fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), BackendError> {
        match name {
            fields::ID => {
                self.id = Uuid::parse_str(&expect_string(name, &value)?)
                    .map_err(|e| invalid(name, e))?;
            }
            fields::USERNAME => self.username = expect_string(name, &value)?,
            fields::EMAIL => self.email = expect_string(name, &value)?,
            fields::CREDENTIAL_HASH => self.credential_hash = expect_string(name, &value)?,
            fields::CREATED_AT => self.created_at = parse_datetime(name, &value)?,
            fields::UPDATED_AT => self.updated_at = parse_datetime(name, &value)?,
            fields::LAST_LOGIN => {
                self.last_login = match value {
                    Value::Null => None,
                    ref v => Some(parse_datetime(name, v)?),
                }
            }
            fields::VERIFIED => self.verified = expect_bool(name, &value)?,
            fields::ACTIVE => self.active = expect_bool(name, &value)?,
            fields::LOGIN_COUNT => {
                self.login_count = value
                    .as_u64()
                    .ok_or_else(|| invalid(name, "expected a non-negative integer"))?
            }
            fields::PROFILE_DATA => self.profile_data = value,
            _ => {
                self.extra.insert(name.to_string(), value);
            }
        }
        Ok(())
    }

    fn add_to_attribute(&mut self, name: &str, delta: i64) -> Result<(), BackendError> {
        if name == fields::LOGIN_COUNT {
            self.login_count = self
                .login_count
                .checked_add_signed(delta)
                .ok_or_else(|| invalid(name, "counter out of range"))?;
            return Ok(());
        }

        if fields::KNOWN.contains(&name) {
            return Err(invalid(name, "attribute is not numeric"));
        }

        // Missing attributes start from zero, mirroring DynamoDB's ADD.
        let current = match self.extra.get(name) {
            None => 0,
            Some(v) => v
                .as_i64()
                .ok_or_else(|| invalid(name, "attribute is not numeric"))?,
        };
        self.extra
            .insert(name.to_string(), Value::from(current + delta));
        Ok(())
    }
}

impl From<AccountRecord> for Account {
    fn from(record: AccountRecord) -> Self {
        record.into_public()
    }
}

fn invalid(name: &str, reason: impl std::fmt::Display) -> BackendError {
    BackendError::InvalidData(format!("Invalid value for {name}: {reason}"))
}

fn expect_string(name: &str, value: &Value) -> Result<String, BackendError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(name, "expected a string"))
}

fn expect_bool(name: &str, value: &Value) -> Result<bool, BackendError> {
    value
        .as_bool()
        .ok_or_else(|| invalid(name, "expected a boolean"))
}

fn parse_datetime(name: &str, value: &Value) -> Result<DateTime<Utc>, BackendError> {
    let s = expect_string(name, value)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| invalid(name, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> AccountRecord {
        AccountRecord::new(
            "alice",
            "alice@example.com",
            "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA",
            json!({"theme": "dark"}),
            DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    #[test]
    fn test_new_record_defaults() {
        let record = sample_record();

        assert!(record.active);
        assert!(!record.verified);
        assert_eq!(record.login_count, 0);
        assert_eq!(record.last_login, None);
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_new_records_get_distinct_ids() {
        assert_ne!(sample_record().id, sample_record().id);
    }

    #[test]
    fn test_public_view_never_serializes_credential_hash() {
        let mut record = sample_record();
        record.extra.insert("nickname".to_string(), json!("ali"));

        let value = serde_json::to_value(record.into_public()).unwrap();
        let object = value.as_object().unwrap();

        assert!(!object.contains_key("credential_hash"));
        assert_eq!(object.get("nickname"), Some(&json!("ali")));
        assert_eq!(object.get("profile_data"), Some(&json!({"theme": "dark"})));
    }

    #[test]
    fn test_apply_sets_known_and_extra_attributes() {
        let mut record = sample_record();
        let update = RecordUpdate::new()
            .set("username", json!("alice2"))
            .set("active", json!(false))
            .set("last_login", json!("2024-02-01T00:00:00Z"))
            .set("nickname", json!("ali"))
            .add("login_count", 1);

        record.apply(&update).unwrap();

        assert_eq!(record.username, "alice2");
        assert!(!record.active);
        assert!(record.last_login.is_some());
        assert_eq!(record.login_count, 1);
        assert_eq!(record.extra.get("nickname"), Some(&json!("ali")));
    }

    #[test]
    fn test_apply_rejects_wrongly_typed_values() {
        let mut record = sample_record();
        let update = RecordUpdate::new().set("active", json!("no"));

        assert!(matches!(
            record.apply(&update),
            Err(BackendError::InvalidData(_))
        ));
    }

    #[test]
    fn test_add_to_missing_extra_attribute_starts_at_zero() {
        let mut record = sample_record();
        record
            .apply(&RecordUpdate::new().add("visits", 3))
            .unwrap();
        record
            .apply(&RecordUpdate::new().add("visits", 2))
            .unwrap();

        assert_eq!(record.extra.get("visits"), Some(&json!(5)));
    }

    #[test]
    fn test_clearing_last_login_with_null() {
        let mut record = sample_record();
        record.last_login = Some(Utc::now());

        record
            .apply(&RecordUpdate::new().set("last_login", Value::Null))
            .unwrap();

        assert_eq!(record.last_login, None);
    }
}
