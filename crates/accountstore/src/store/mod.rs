//! The account store: account-level operations on top of a record backend.

mod service;
mod types;

pub use service::AccountStore;
pub use types::{Credentials, HealthStatus, NewAccount};
