mod error;
mod traits;
mod types;

pub use error::{BackendError, Result};
pub use traits::RecordBackend;
pub use types::{
    schema_problems, RecordUpdate, TableSchema, TableStats, TableStatus, EMAIL_INDEX, ENTITY_TYPE,
    PARTITION_KEY,
};
