pub mod error;
pub mod types;

pub use error::{MigrateError, Result};
pub use types::{Document, LedgerEntry, Row, SeedSpecification, TableSchema, Value};
