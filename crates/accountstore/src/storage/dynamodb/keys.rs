//! DynamoDB key generation functions.
//!
//! Pure functions for generating partition keys. Accounts and email claims
//! share the table and are told apart by their key prefix and entity type.

use uuid::Uuid;

pub const ACCOUNT_PREFIX: &str = "ACCOUNT#";
pub const EMAIL_PREFIX: &str = "EMAIL#";

pub const ENTITY_TYPE_ACCOUNT: &str = "ACCOUNT";
pub const ENTITY_TYPE_EMAIL_CLAIM: &str = "EMAIL_CLAIM";

/// Generate partition key for an account.
///
/// Pattern: `ACCOUNT#<account_id>`
pub fn account_pk(account_id: Uuid) -> String {
    format!("{ACCOUNT_PREFIX}{account_id}")
}

/// Generate partition key for the claim that reserves an email.
///
/// Pattern: `EMAIL#<email>`. The email must already be normalized.
pub fn email_claim_pk(email: &str) -> String {
    format!("{EMAIL_PREFIX}{email}")
}
