//! DynamoDB storage backend implementation.
//!
//! This module provides a DynamoDB-based implementation of
//! [`RecordBackend`](accountstore_core::storage::RecordBackend) using `aws-sdk-dynamodb`.

mod client;
mod conversions;
mod error;
mod expression;
mod keys;
mod repository;

pub use client::create_client;
pub use repository::DynamoDbRepository;
