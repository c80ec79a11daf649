//! In-memory storage backend.
//!
//! This module provides an in-memory implementation of
//! [`RecordBackend`](accountstore_core::storage::RecordBackend) that keeps
//! every record in a HashMap wrapped in `Arc<RwLock<_>>`. Conditional writes
//! are evaluated under the write lock, so they are as atomic as DynamoDB's.
//!
//! # Example
//!
//! ```rust,ignore
//! use accountstore::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! // Use repo for testing...
//! ```

mod repository;

pub use repository::InMemoryRepository;
