//! Shared application state.
//!
//! The store is built once at startup. When its backend cannot be
//! constructed the process still serves, reporting every store call as
//! unavailable instead of exiting.

use std::sync::Arc;

use accountstore_core::account::AccountError;
use accountstore_core::storage::RecordBackend;

use crate::config::{BackendKind, Config};
use crate::storage::InMemoryRepository;
use crate::store::{AccountStore, HealthStatus};

#[derive(Clone)]
enum StoreState {
    Ready(AccountStore),
    Unavailable { reason: String },
}

/// Shared application state, cloned into each handler.
#[derive(Clone)]
pub struct AppState {
    store: StoreState,
}

impl AppState {
    pub fn new(store: AccountStore) -> Self {
        Self {
            store: StoreState::Ready(store),
        }
    }

    /// State for a process whose backend could not be built.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            store: StoreState::Unavailable {
                reason: reason.into(),
            },
        }
    }

    /// Builds the store selected by `config`.
    pub async fn from_config(config: &Config) -> Self {
        let backend = match build_backend(config).await {
            Ok(backend) => backend,
            Err(reason) => {
                tracing::error!(backend = %config.backend, %reason, "Account store unavailable");
                return Self::unavailable(reason);
            }
        };

        let store = AccountStore::new(backend).with_timeout(config.store_timeout());
        tracing::info!(
            backend = %config.backend,
            timeout_ms = config.store_timeout_ms,
            "Account store ready"
        );
        Self::new(store)
    }

    /// The store, or the reason it is missing.
    pub fn store(&self) -> Result<&AccountStore, AccountError> {
        match &self.store {
            StoreState::Ready(store) => Ok(store),
            StoreState::Unavailable { reason } => {
                Err(AccountError::BackendUnavailable(reason.clone()))
            }
        }
    }

    pub async fn health(&self) -> HealthStatus {
        match &self.store {
            StoreState::Ready(store) => store.health().await,
            StoreState::Unavailable { reason } => HealthStatus::unavailable(reason.clone()),
        }
    }
}

impl Default for AppState {
    /// In-memory store, for tests and local runs.
    fn default() -> Self {
        Self::new(AccountStore::new(Arc::new(InMemoryRepository::new())))
    }
}

async fn build_backend(config: &Config) -> Result<Arc<dyn RecordBackend>, String> {
    match config.backend {
        BackendKind::Memory => Ok(Arc::new(InMemoryRepository::new())),
        BackendKind::DynamoDb => dynamodb_backend(config).await,
    }
}

#[cfg(feature = "dynamodb")]
async fn dynamodb_backend(config: &Config) -> Result<Arc<dyn RecordBackend>, String> {
    use crate::storage::{dynamodb::create_client, DynamoDbRepository};

    let client = create_client(&config.dynamodb)
        .await
        .map_err(|e| e.to_string())?;

    let repository = DynamoDbRepository::new(client, config.dynamodb.table_name.clone());

    tracing::info!(
        table = %repository.table_name(),
        region = %config.dynamodb.region,
        endpoint = config.dynamodb.endpoint_url.as_deref().unwrap_or("default"),
        "Using DynamoDB backend"
    );
    Ok(Arc::new(repository))
}

#[cfg(not(feature = "dynamodb"))]
async fn dynamodb_backend(_config: &Config) -> Result<Arc<dyn RecordBackend>, String> {
    Err("built without the dynamodb feature".to_string())
}
