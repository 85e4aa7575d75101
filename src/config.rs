use std::env;
use std::path::{Path, PathBuf};

pub const DOCUMENT_FILE: &str = "db.json";
pub const LEDGER_FILE: &str = "migrations_history.json";
pub const SEED_FILE: &str = "seeds/seed-data.json";

/// File locations used by the engine, the seeder and reset.
///
/// Nothing in the crate resolves paths on its own; every component receives
/// one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateConfig {
    /// The persisted `{schema, data}` document
    pub document_path: PathBuf,

    /// The applied-migrations ledger
    pub ledger_path: PathBuf,

    /// Externally authored seed data
    pub seed_path: PathBuf,
}

impl MigrateConfig {
    /// Default file layout rooted at `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            document_path: dir.join(DOCUMENT_FILE),
            ledger_path: dir.join(LEDGER_FILE),
            seed_path: dir.join(SEED_FILE),
        }
    }

    /// Reads `DOCMIGRATE_DIR` (default `.`) and the optional per-file
    /// overrides `DOCMIGRATE_DOCUMENT`, `DOCMIGRATE_LEDGER`, `DOCMIGRATE_SEED`.
    pub fn from_env() -> Self {
        let dir = env::var("DOCMIGRATE_DIR").unwrap_or_else(|_| ".".to_string());
        let mut config = Self::in_dir(dir);

        if let Ok(path) = env::var("DOCMIGRATE_DOCUMENT") {
            config = config.document_path(path);
        }
        if let Ok(path) = env::var("DOCMIGRATE_LEDGER") {
            config = config.ledger_path(path);
        }
        if let Ok(path) = env::var("DOCMIGRATE_SEED") {
            config = config.seed_path(path);
        }
        config
    }

    /// Set the document path
    pub fn document_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.document_path = path.into();
        self
    }

    /// Set the ledger path
    pub fn ledger_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ledger_path = path.into();
        self
    }

    /// Set the seed file path
    pub fn seed_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.seed_path = path.into();
        self
    }
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self::in_dir(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_layout() {
        let config = MigrateConfig::in_dir("/data");
        assert_eq!(config.document_path, PathBuf::from("/data/db.json"));
        assert_eq!(config.ledger_path, PathBuf::from("/data/migrations_history.json"));
        assert_eq!(config.seed_path, PathBuf::from("/data/seeds/seed-data.json"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = MigrateConfig::in_dir("/data")
            .document_path("/tmp/doc.json")
            .seed_path("seed.json");

        assert_eq!(config.document_path, PathBuf::from("/tmp/doc.json"));
        assert_eq!(config.ledger_path, PathBuf::from("/data/migrations_history.json"));
        assert_eq!(config.seed_path, PathBuf::from("seed.json"));
    }
}
