//! Account operations over a [`RecordBackend`].

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use accountstore_core::account::{
    fields, hash_password, normalize_email, sanitize_update, validate_new_account,
    verify_password, Account, AccountError, AccountRecord, Result,
};
use accountstore_core::storage::{
    schema_problems, BackendError, RecordBackend, RecordUpdate, TableStats,
};
use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{Credentials, HealthStatus, NewAccount};

/// Default deadline applied to each backend call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Account store facade.
///
/// Cheap to clone; every clone shares the same backend.
#[derive(Clone)]
pub struct AccountStore {
    backend: Arc<dyn RecordBackend>,
    timeout: Duration,
}

impl AccountStore {
    pub fn new(backend: Arc<dyn RecordBackend>) -> Self {
        Self {
            backend,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Returns a store sharing this backend with a different per-call deadline.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            timeout,
        }
    }

    /// Runs a backend call under the store deadline.
    async fn call<T>(
        &self,
        fut: impl Future<Output = std::result::Result<T, BackendError>>,
    ) -> std::result::Result<T, BackendError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout),
        }
    }

    /// Creates an account with a unique email.
    pub async fn create(&self, new: NewAccount) -> Result<Account> {
        validate_new_account(&new.username, &new.email, &new.password)?;

        let profile_data = match new.profile_data {
            Value::Null => Value::Object(Map::new()),
            data => data,
        };

        let email = normalize_email(&new.email);
        if self.call(self.backend.find_by_email(&email)).await?.is_some() {
            tracing::info!(email = %email, "Rejected create for registered email");
            return Err(AccountError::DuplicateEmail { email });
        }

        let credential_hash = hash_blocking(new.password).await?;
        let record = AccountRecord::new(
            new.username.trim(),
            email.clone(),
            credential_hash,
            profile_data,
            Utc::now(),
        );

        match self.call(self.backend.put_if_email_absent(&record)).await {
            Ok(()) => {}
            Err(BackendError::ConditionFailed) => {
                tracing::info!(email = %email, "Lost create race for email");
                return Err(AccountError::DuplicateEmail { email });
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to store new account");
                return Err(e.into());
            }
        }

        tracing::info!(account_id = %record.id, "Created account");
        Ok(record.into_public())
    }

    /// Verifies credentials and records the login.
    ///
    /// The login counter and timestamps are updated in a single backend write.
    /// If that write fails the login fails with it.
    pub async fn authenticate(&self, credentials: Credentials) -> Result<Account> {
        let Credentials { email, password } = credentials;
        if email.trim().is_empty() || password.is_empty() {
            return Err(AccountError::InvalidInput(
                "email and password are required".to_string(),
            ));
        }

        let email = normalize_email(&email);
        let record = self
            .call(self.backend.find_by_email(&email))
            .await?
            .ok_or_else(|| AccountError::NotFound { key: email.clone() })?;

        if !record.active {
            tracing::info!(account_id = %record.id, "Login attempt on deactivated account");
            return Err(AccountError::Deactivated);
        }

        if !verify_blocking(password, record.credential_hash.clone()).await? {
            tracing::warn!(account_id = %record.id, "Login attempt with wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        let now = Value::String(Utc::now().to_rfc3339());
        let update = RecordUpdate::new()
            .set(fields::LAST_LOGIN, now.clone())
            .set(fields::UPDATED_AT, now)
            .add(fields::LOGIN_COUNT, 1);

        let updated = self
            .call(self.backend.update_if_exists(record.id, &update))
            .await
            .map_err(|e| {
                tracing::error!(account_id = %record.id, error = %e, "Failed to record login");
                AccountError::from(e)
            })?;

        tracing::info!(
            account_id = %updated.id,
            login_count = updated.login_count,
            "Authenticated account"
        );
        Ok(updated.into_public())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Account> {
        let uuid = parse_id(id)?;
        self.call(self.backend.get(uuid))
            .await?
            .map(AccountRecord::into_public)
            .ok_or_else(|| AccountError::NotFound { key: id.to_string() })
    }

    /// Applies a partial update.
    ///
    /// Immutable attributes are dropped before anything reaches the backend,
    /// and the write only lands if the account exists.
    pub async fn update(&self, id: &str, changes: Map<String, Value>) -> Result<Account> {
        let uuid = parse_id(id)?;
        let update = sanitize_update(changes, Utc::now())?;

        let updated = self
            .call(self.backend.update_if_exists(uuid, &update))
            .await?;

        tracing::info!(account_id = %uuid, fields = update.set.len(), "Updated account");
        Ok(updated.into_public())
    }

    /// Deactivates an account. The record is kept.
    pub async fn soft_delete(&self, id: &str) -> Result<()> {
        let mut changes = Map::new();
        changes.insert(fields::ACTIVE.to_string(), Value::Bool(false));
        self.update(id, changes).await?;

        tracing::info!(account_id = %id, "Deactivated account");
        Ok(())
    }

    pub async fn list(&self, active_only: bool) -> Result<Vec<Account>> {
        let records = self.call(self.backend.scan(active_only)).await?;
        tracing::debug!(count = records.len(), active_only, "Listed accounts");
        Ok(records.into_iter().map(AccountRecord::into_public).collect())
    }

    /// Table metadata. Counts are approximate and may lag recent writes.
    pub async fn stats(&self) -> Result<TableStats> {
        Ok(self.call(self.backend.describe()).await?)
    }

    /// Checks the table is reachable and shaped as expected.
    pub async fn health(&self) -> HealthStatus {
        let started = Instant::now();
        let result = self.call(self.backend.describe_schema()).await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(schema) => {
                let problems = schema_problems(&schema);
                if !problems.is_empty() {
                    tracing::warn!(?problems, table = %schema.table_name, "Table not ready");
                }
                HealthStatus {
                    healthy: problems.is_empty(),
                    table_name: Some(schema.table_name),
                    status: Some(schema.status),
                    problems,
                    latency_ms,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Health check failed");
                HealthStatus {
                    healthy: false,
                    table_name: None,
                    status: None,
                    problems: vec![AccountError::from(e).to_string()],
                    latency_ms,
                }
            }
        }
    }
}

/// Unparseable IDs cannot name an account.
fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| AccountError::NotFound {
        key: id.to_string(),
    })
}

async fn hash_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AccountError::Internal(format!("hashing task failed: {e}")))?
}

async fn verify_blocking(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AccountError::Internal(format!("verification task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use accountstore_core::storage::{TableSchema, TableStatus};
    use async_trait::async_trait;
    use serde_json::json;

    use crate::storage::InMemoryRepository;

    /// Wraps the in-memory backend to observe and disturb calls.
    #[derive(Default)]
    struct TestBackend {
        inner: InMemoryRepository,
        update_calls: AtomicUsize,
        fail_updates: AtomicBool,
        hide_emails: bool,
        delay: Option<Duration>,
    }

    impl TestBackend {
        async fn pause(&self) {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
        }
    }

    #[async_trait]
    impl RecordBackend for TestBackend {
        async fn get(&self, id: Uuid) -> std::result::Result<Option<AccountRecord>, BackendError> {
            self.pause().await;
            self.inner.get(id).await
        }

        async fn put_if_email_absent(
            &self,
            record: &AccountRecord,
        ) -> std::result::Result<(), BackendError> {
            self.pause().await;
            self.inner.put_if_email_absent(record).await
        }

        async fn update_if_exists(
            &self,
            id: Uuid,
            update: &RecordUpdate,
        ) -> std::result::Result<AccountRecord, BackendError> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_updates.load(Ordering::SeqCst) {
                return Err(BackendError::ConnectionFailed("connection reset".to_string()));
            }
            self.inner.update_if_exists(id, update).await
        }

        async fn find_by_email(
            &self,
            email: &str,
        ) -> std::result::Result<Option<AccountRecord>, BackendError> {
            self.pause().await;
            if self.hide_emails {
                return Ok(None);
            }
            self.inner.find_by_email(email).await
        }

        async fn scan(
            &self,
            active_only: bool,
        ) -> std::result::Result<Vec<AccountRecord>, BackendError> {
            self.inner.scan(active_only).await
        }

        async fn describe(&self) -> std::result::Result<TableStats, BackendError> {
            self.inner.describe().await
        }

        async fn describe_schema(&self) -> std::result::Result<TableSchema, BackendError> {
            self.pause().await;
            self.inner.describe_schema().await
        }
    }

    fn store_with(backend: TestBackend) -> (AccountStore, Arc<TestBackend>) {
        let backend = Arc::new(backend);
        (AccountStore::new(backend.clone()), backend)
    }

    fn memory_store() -> AccountStore {
        AccountStore::new(Arc::new(InMemoryRepository::new()))
    }

    fn new_account(username: &str, email: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            password: "s3cret".to_string(),
            profile_data: json!({"name": "Test"}),
        }
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn changes(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_create_returns_fresh_account() {
        let store = memory_store();

        let account = store
            .create(new_account("alice", "Alice@Example.com"))
            .await
            .unwrap();

        assert_eq!(account.username, "alice");
        assert_eq!(account.email, "alice@example.com");
        assert!(account.active);
        assert!(!account.verified);
        assert_eq!(account.login_count, 0);
        assert!(account.last_login.is_none());
        assert_eq!(account.created_at, account.updated_at);
        assert_eq!(account.profile_data, json!({"name": "Test"}));
    }

    #[tokio::test]
    async fn test_create_distinct_emails_get_distinct_ids() {
        let store = memory_store();

        let a = store.create(new_account("a", "a@example.com")).await.unwrap();
        let b = store.create(new_account("b", "b@example.com")).await.unwrap();

        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_create_defaults_profile_data_to_empty_object() {
        let store = memory_store();
        let mut new = new_account("alice", "alice@example.com");
        new.profile_data = Value::Null;

        let account = store.create(new).await.unwrap();

        assert_eq!(account.profile_data, json!({}));
    }

    #[tokio::test]
    async fn test_profile_data_accepts_any_document() {
        let store = memory_store();

        for (i, data) in [json!([1, 2]), json!("note"), json!(42)].into_iter().enumerate() {
            let mut new = new_account("user", &format!("user{i}@example.com"));
            new.profile_data = data.clone();

            let created = store.create(new).await.unwrap();
            let fetched = store.get_by_id(&created.id.to_string()).await.unwrap();
            assert_eq!(fetched.profile_data, data);
        }
    }

    #[tokio::test]
    async fn test_update_replaces_profile_data_with_any_document() {
        let store = memory_store();
        let created = store
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();
        let id = created.id.to_string();

        let updated = store
            .update(&id, changes(json!({"profile_data": ["a", {"b": true}]})))
            .await
            .unwrap();

        assert_eq!(updated.profile_data, json!(["a", {"b": true}]));
        assert_eq!(
            store.get_by_id(&id).await.unwrap().profile_data,
            json!(["a", {"b": true}])
        );
    }

    #[tokio::test]
    async fn test_old_email_is_free_after_email_change() {
        let store = memory_store();
        let created = store
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();

        store
            .update(
                &created.id.to_string(),
                changes(json!({"email": "alice@new.example.com"})),
            )
            .await
            .unwrap();

        let again = store
            .create(new_account("other", "alice@example.com"))
            .await
            .unwrap();
        assert_ne!(again.id, created.id);
        assert_eq!(again.email, "alice@example.com");

        let taken = store
            .create(new_account("third", "alice@new.example.com"))
            .await;
        assert!(matches!(taken, Err(AccountError::DuplicateEmail { .. })));
    }

    #[tokio::test]
    async fn test_create_missing_fields_is_invalid_input() {
        let store = memory_store();

        let result = store
            .create(NewAccount {
                username: "alice".to_string(),
                ..Default::default()
            })
            .await;

        match result {
            Err(AccountError::InvalidInput(msg)) => {
                assert!(msg.contains("email"));
                assert!(msg.contains("password"));
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        assert!(store.list(false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_email_ignores_case() {
        let store = memory_store();
        store
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = store.create(new_account("other", "ALICE@example.com")).await;

        assert!(matches!(result, Err(AccountError::DuplicateEmail { .. })));
        assert_eq!(store.list(false).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_duplicate_caught_by_conditional_write() {
        // The lookup never sees the first account, so only the write guards.
        let (store, _) = store_with(TestBackend {
            hide_emails: true,
            ..Default::default()
        });
        store
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = store.create(new_account("bob", "alice@example.com")).await;

        assert_eq!(
            result.unwrap_err(),
            AccountError::DuplicateEmail {
                email: "alice@example.com".to_string()
            }
        );
        assert_eq!(store.list(false).await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_same_email_one_wins() {
        let store = memory_store();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .create(new_account(&format!("user{i}"), "race@example.com"))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AccountError::DuplicateEmail { .. }) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.list(false).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_authenticate_counts_logins() {
        let store = memory_store();
        let created = store
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();

        for expected in 1..=3 {
            let account = store
                .authenticate(credentials("alice@example.com", "s3cret"))
                .await
                .unwrap();
            assert_eq!(account.login_count, expected);
            assert!(account.last_login.is_some());
        }

        let stored = store.get_by_id(&created.id.to_string()).await.unwrap();
        assert_eq!(stored.login_count, 3);
        assert!(stored.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_authenticate_email_is_case_insensitive() {
        let store = memory_store();
        store
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();

        let account = store
            .authenticate(credentials(" Alice@EXAMPLE.com", "s3cret"))
            .await
            .unwrap();

        assert_eq!(account.login_count, 1);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password_changes_nothing() {
        let (store, backend) = store_with(TestBackend::default());
        let created = store
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = store
            .authenticate(credentials("alice@example.com", "wrong"))
            .await;

        assert_eq!(result.unwrap_err(), AccountError::InvalidCredentials);
        assert_eq!(backend.update_calls.load(Ordering::SeqCst), 0);
        let stored = store.get_by_id(&created.id.to_string()).await.unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let store = memory_store();

        let result = store
            .authenticate(credentials("nobody@example.com", "s3cret"))
            .await;

        assert!(matches!(result, Err(AccountError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_authenticate_deactivated_account() {
        let (store, backend) = store_with(TestBackend::default());
        let created = store
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();
        store.soft_delete(&created.id.to_string()).await.unwrap();
        let writes_before = backend.update_calls.load(Ordering::SeqCst);

        let result = store
            .authenticate(credentials("alice@example.com", "s3cret"))
            .await;

        assert_eq!(result.unwrap_err(), AccountError::Deactivated);
        assert_eq!(backend.update_calls.load(Ordering::SeqCst), writes_before);
    }

    #[tokio::test]
    async fn test_authenticate_fails_when_login_cannot_be_recorded() {
        let (store, backend) = store_with(TestBackend::default());
        store
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();
        backend.fail_updates.store(true, Ordering::SeqCst);

        let result = store
            .authenticate(credentials("alice@example.com", "s3cret"))
            .await;

        assert!(matches!(result, Err(AccountError::BackendUnavailable(_))));
    }

    #[tokio::test]
    async fn test_update_drops_immutable_fields() {
        let store = memory_store();
        let created = store
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();

        let updated = store
            .update(
                &created.id.to_string(),
                changes(json!({
                    "id": "00000000-0000-0000-0000-000000000000",
                    "created_at": "2000-01-01T00:00:00Z",
                    "credential_hash": "forged",
                    "username": "alice2",
                })),
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.username, "alice2");
        assert!(updated.updated_at >= created.updated_at);

        // The old password still works, so the hash was not replaced.
        store
            .authenticate(credentials("alice@example.com", "s3cret"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_only_immutable_fields_is_rejected() {
        let (store, backend) = store_with(TestBackend::default());
        let created = store
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = store
            .update(&created.id.to_string(), changes(json!({"id": "x"})))
            .await;

        assert_eq!(result.unwrap_err(), AccountError::NoFieldsToUpdate);
        assert_eq!(backend.update_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_stores_custom_attributes() {
        let store = memory_store();
        let created = store
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();

        let updated = store
            .update(
                &created.id.to_string(),
                changes(json!({"verified": true, "nickname": "al"})),
            )
            .await
            .unwrap();

        assert!(updated.verified);
        assert_eq!(updated.extra.get("nickname"), Some(&json!("al")));
    }

    #[tokio::test]
    async fn test_update_nonexistent_writes_nothing() {
        let store = memory_store();
        let id = Uuid::new_v4().to_string();

        let result = store.update(&id, changes(json!({"username": "x"}))).await;

        assert_eq!(result.unwrap_err(), AccountError::NotFound { key: id });
        assert!(store.list(false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found_without_backend_call() {
        let (store, backend) = store_with(TestBackend::default());

        let get = store.get_by_id("not-a-uuid").await;
        let update = store
            .update("not-a-uuid", changes(json!({"username": "x"})))
            .await;

        assert!(matches!(get, Err(AccountError::NotFound { .. })));
        assert!(matches!(update, Err(AccountError::NotFound { .. })));
        assert_eq!(backend.update_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_soft_delete_keeps_record() {
        let store = memory_store();
        let created = store
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();
        let id = created.id.to_string();

        store.soft_delete(&id).await.unwrap();

        let stored = store.get_by_id(&id).await.unwrap();
        assert!(!stored.active);
        assert!(store.list(true).await.unwrap().is_empty());
        assert_eq!(store.list(false).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_soft_delete_nonexistent() {
        let store = memory_store();

        let result = store.soft_delete(&Uuid::new_v4().to_string()).await;

        assert!(matches!(result, Err(AccountError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_outputs_never_carry_credential_hash() {
        let store = memory_store();
        let created = store
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();
        let authed = store
            .authenticate(credentials("alice@example.com", "s3cret"))
            .await
            .unwrap();
        let fetched = store.get_by_id(&created.id.to_string()).await.unwrap();
        let listed = store.list(false).await.unwrap();

        for value in [
            serde_json::to_value(&created).unwrap(),
            serde_json::to_value(&authed).unwrap(),
            serde_json::to_value(&fetched).unwrap(),
            serde_json::to_value(&listed).unwrap(),
        ] {
            let text = value.to_string();
            assert!(!text.contains("credential_hash"));
            assert!(!text.contains("argon2"));
        }
    }

    #[tokio::test]
    async fn test_stats_and_health() {
        let store = memory_store();
        store
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.item_count, 1);
        assert_eq!(stats.status, TableStatus::Active);

        let health = store.health().await;
        assert!(health.healthy);
        assert!(health.problems.is_empty());
        assert_eq!(health.status, Some(TableStatus::Active));
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let (store, _) = store_with(TestBackend {
            delay: Some(Duration::from_millis(200)),
            ..Default::default()
        });
        let store = store.with_timeout(Duration::from_millis(20));

        let result = store.get_by_id(&Uuid::new_v4().to_string()).await;
        assert_eq!(result.unwrap_err(), AccountError::Timeout);

        let health = store.health().await;
        assert!(!health.healthy);
        assert_eq!(health.problems, vec!["Operation timed out".to_string()]);
    }

    #[tokio::test]
    async fn test_account_lifecycle() {
        let store = memory_store();

        let created = store
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();
        let id = created.id.to_string();

        let authed = store
            .authenticate(credentials("alice@example.com", "s3cret"))
            .await
            .unwrap();
        assert_eq!(authed.login_count, 1);

        let updated = store
            .update(&id, changes(json!({"profile_data": {"name": "Alice"}})))
            .await
            .unwrap();
        assert_eq!(updated.profile_data, json!({"name": "Alice"}));
        assert_eq!(updated.login_count, 1);

        store.soft_delete(&id).await.unwrap();
        assert_eq!(
            store
                .authenticate(credentials("alice@example.com", "s3cret"))
                .await
                .unwrap_err(),
            AccountError::Deactivated
        );

        let all = store.list(false).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(!all[0].active);
        assert!(store.list(true).await.unwrap().is_empty());
    }
}
