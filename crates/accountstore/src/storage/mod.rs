//! Storage backend implementations.
//!
//! This module provides concrete implementations of the
//! [`RecordBackend`](accountstore_core::storage::RecordBackend) trait.
//!
//! # Feature Flags
//!
//! - `dynamodb` (default): AWS DynamoDB backend using `aws-sdk-dynamodb`
//!
//! The in-memory backend is always compiled; it backs the test suites and
//! `STORE_BACKEND=memory` local runs.
//!
//! # Examples
//!
//! Build with DynamoDB (default):
//! ```bash
//! cargo build -p accountstore
//! ```
//!
//! Build without the AWS SDK:
//! ```bash
//! cargo build -p accountstore --no-default-features
//! ```

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbRepository;

pub use inmemory::InMemoryRepository;
