use crate::core::{LedgerEntry, Result};
use crate::storage::atomic::{self, StagedWrite};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Durable, ordered record of applied migrations.
///
/// The ledger keeps entries in the order it is given them; keeping that
/// order equal to version order is the engine's job.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all entries. A missing file means nothing has been applied yet.
    pub fn load(&self) -> Result<Vec<LedgerEntry>> {
        Ok(atomic::read_json(&self.path)?.unwrap_or_default())
    }

    /// Overwrites the ledger.
    pub fn persist(&self, entries: &[LedgerEntry]) -> Result<()> {
        atomic::write_json(&self.path, entries)
    }

    pub fn stage(&self, entries: &[LedgerEntry]) -> Result<StagedWrite> {
        StagedWrite::stage(&self.path, entries)
    }

    pub fn applied_versions(entries: &[LedgerEntry]) -> HashSet<&str> {
        entries.iter().map(|entry| entry.version.as_str()).collect()
    }
}
