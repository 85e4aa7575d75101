use crate::migration::Direction;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("Failed to read '{}': {reason}", .path.display())]
    StorageRead { path: PathBuf, reason: String },

    #[error("Failed to write '{}': {reason}", .path.display())]
    StorageWrite { path: PathBuf, reason: String },

    #[error("Migration '{name}' failed while running {direction}: {source}")]
    MigrationExecution {
        name: String,
        direction: Direction,
        #[source]
        source: Box<MigrateError>,
    },

    #[error("Migration '{name}' (version {version}) is recorded as applied but is not registered")]
    MissingDefinition { name: String, version: String },

    #[error("Duplicate migration version '{version}': '{first}' and '{second}'")]
    DuplicateVersion {
        version: String,
        first: String,
        second: String,
    },

    #[error("Invalid migration name '{0}': expected '<version>-<description>'")]
    InvalidMigrationName(String),

    #[error("Migration '{pending}' is pending but sorts before already applied '{applied}'")]
    OutOfOrder { pending: String, applied: String },

    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

impl MigrateError {
    pub(crate) fn read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::StorageRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::StorageWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
