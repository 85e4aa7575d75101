use crate::core::{MigrateError, Result};
use crate::migration::{Migration, MigrationDefinition};
use std::collections::HashMap;
use std::sync::Arc;

/// Extracts the version from a `<version>-<description>` name: everything
/// before the first `-`, or the whole name when there is no separator.
pub fn version_of(name: &str) -> Result<&str> {
    let version = name.split('-').next().unwrap_or_default();
    if version.is_empty() {
        return Err(MigrateError::InvalidMigrationName(name.to_string()));
    }
    Ok(version)
}

/// Explicit manifest of every known migration.
///
/// Registration order does not matter; [`MigrationRegistry::discover`]
/// sorts by version.
#[derive(Clone, Default)]
pub struct MigrationRegistry {
    migrations: Vec<Arc<dyn Migration>>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, migration: impl Migration + 'static) {
        self.migrations.push(Arc::new(migration));
    }

    /// Fluent form of [`MigrationRegistry::register`].
    pub fn with(mut self, migration: impl Migration + 'static) -> Self {
        self.register(migration);
        self
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// Returns every definition in ascending version order.
    ///
    /// Fails on a malformed name or when two migrations share a version.
    pub fn discover(&self) -> Result<Vec<MigrationDefinition>> {
        let mut seen = HashMap::<&str, &str>::new();
        let mut definitions = Vec::with_capacity(self.migrations.len());

        for migration in &self.migrations {
            let name = migration.name();
            let version = version_of(name)?;

            if let Some(first) = seen.insert(version, name) {
                return Err(MigrateError::DuplicateVersion {
                    version: version.to_string(),
                    first: first.to_string(),
                    second: name.to_string(),
                });
            }

            definitions.push(MigrationDefinition {
                version: version.to_string(),
                name: name.to_string(),
                migration: Arc::clone(migration),
            });
        }

        definitions.sort_by(|a, b| a.version.cmp(&b.version));
        Ok(definitions)
    }
}

impl std::fmt::Debug for MigrationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.migrations.iter().map(|m| m.name()))
            .finish()
    }
}
