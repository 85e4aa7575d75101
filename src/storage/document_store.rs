use crate::core::{Document, MigrateError, Result};
use crate::storage::atomic::{self, StagedWrite};
use std::path::{Path, PathBuf};

/// The single persisted document.
///
/// Reads always go to disk; there is no in-process caching between
/// operations.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the document. A missing file is an error: the document must be
    /// created (e.g. by reset) before it can be migrated or seeded.
    pub fn load(&self) -> Result<Document> {
        atomic::read_json(&self.path)?
            .ok_or_else(|| MigrateError::read(&self.path, "file does not exist"))
    }

    pub fn save(&self, document: &Document) -> Result<()> {
        atomic::write_json(&self.path, document)
    }

    /// Writes the document to a temp file without replacing the original yet.
    pub fn stage(&self, document: &Document) -> Result<StagedWrite> {
        StagedWrite::stage(&self.path, document)
    }
}
