use std::{env, fmt, str::FromStr, time::Duration};

/// Which record backend serves the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    DynamoDb,
    Memory,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dynamodb" | "ddb" => Ok(Self::DynamoDb),
            "memory" | "inmemory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DynamoDb => write!(f, "dynamodb"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// DynamoDB connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoDbConfig {
    /// Table holding accounts (default: "MyProjectTableDev")
    pub table_name: String,
    /// AWS region (default: "us-east-1")
    pub region: String,
    /// Custom endpoint for LocalStack or DynamoDB Local
    pub endpoint_url: Option<String>,
    /// Named AWS profile
    pub profile: Option<String>,
    /// Attempts per request under the standard retry mode (default: 10)
    pub max_attempts: u32,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Record backend (default: dynamodb)
    pub backend: BackendKind,
    pub dynamodb: DynamoDbConfig,
    /// Deadline for each backend call in milliseconds (default: 5,000)
    pub store_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STORE_BACKEND` - `dynamodb` or `memory` (default: dynamodb)
    /// - `DDB_TABLE_NAME` - Table name (default: "MyProjectTableDev")
    /// - `AWS_REGION` - Region (default: "us-east-1")
    /// - `AWS_DDB_ENDPOINT` - Custom DynamoDB endpoint
    /// - `AWS_PROFILE` - Named AWS profile
    /// - `DDB_MAX_ATTEMPTS` - Retry attempts per request (default: 10)
    /// - `STORE_TIMEOUT_MS` - Per-call deadline in milliseconds (default: 5,000)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match non_empty("STORE_BACKEND").map(|v| v.parse::<BackendKind>()) {
            Some(Ok(kind)) => kind,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Falling back to the dynamodb backend");
                BackendKind::DynamoDb
            }
            None => BackendKind::DynamoDb,
        };

        Self {
            backend,
            dynamodb: DynamoDbConfig {
                table_name: non_empty("DDB_TABLE_NAME")
                    .unwrap_or_else(|| "MyProjectTableDev".to_string()),
                region: non_empty("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                endpoint_url: non_empty("AWS_DDB_ENDPOINT"),
                profile: non_empty("AWS_PROFILE"),
                max_attempts: non_empty("DDB_MAX_ATTEMPTS")
                    .and_then(|v| v.parse().ok())
                    .filter(|attempts| *attempts > 0)
                    .unwrap_or(10),
            },
            store_timeout_ms: non_empty("STORE_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(5_000),
        }
    }

    /// Get the store deadline as a Duration.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
