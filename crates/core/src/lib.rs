//! Functional core for the account store.
//!
//! Holds the domain types, error enums, the [`storage::RecordBackend`] trait
//! and the pure helpers the imperative shell composes. Nothing in this crate
//! talks to a network or a database.

pub mod account;
pub mod storage;
