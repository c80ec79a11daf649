mod credentials;
mod error;
mod functions;
mod http_mapping;
mod types;

pub use credentials::{hash_password, verify_password};
pub use error::{AccountError, Result};
pub use functions::{is_protected_field, normalize_email, sanitize_update, validate_new_account};
pub use http_mapping::account_error_to_status_code;
pub use types::{fields, Account, AccountRecord};
