use accountstore_core::storage::TableStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters for creating an account.
///
/// Missing fields deserialize as empty so they are reported as invalid input
/// by the store rather than rejected by the decoder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAccount {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub profile_data: Value,
}

/// Credentials presented to `authenticate`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Result of a store health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TableStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<String>,
    pub latency_ms: u64,
}

impl HealthStatus {
    /// Health of a store that never came up.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            healthy: false,
            table_name: None,
            status: None,
            problems: vec![reason.into()],
            latency_ms: 0,
        }
    }
}
