//! Applies and rolls back migrations against the persisted document
//!
//! Every operation reads the ledger and the document from disk, works on an
//! in-memory copy, and writes both back only once every step has succeeded.
//! A failed step therefore leaves the files exactly as they were.

use crate::config::MigrateConfig;
use crate::core::{Document, LedgerEntry, MigrateError, Result};
use crate::migration::{Direction, MigrationDefinition, MigrationRegistry};
use crate::storage::{DocumentStore, Ledger, commit_all};
use tracing::{Instrument, error, info, info_span};

/// Result of [`MigrationEngine::up`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpOutcome {
    NoPending,
    /// Entries appended to the ledger, in application order
    Applied(Vec<LedgerEntry>),
}

/// Result of [`MigrationEngine::down`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownOutcome {
    NothingToRollBack,
    /// The ledger entry that was removed
    RolledBack(LedgerEntry),
}

/// Read-only view of what has been applied and what is still pending.
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    pub applied: Vec<LedgerEntry>,
    pub pending: Vec<MigrationDefinition>,
}

pub struct MigrationEngine {
    registry: MigrationRegistry,
    store: DocumentStore,
    ledger: Ledger,
}

impl MigrationEngine {
    pub fn new(config: &MigrateConfig, registry: MigrationRegistry) -> Self {
        Self {
            registry,
            store: DocumentStore::new(&config.document_path),
            ledger: Ledger::new(&config.ledger_path),
        }
    }

    pub fn registry(&self) -> &MigrationRegistry {
        &self.registry
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Applies every pending migration in ascending version order.
    ///
    /// All pending steps run against one in-memory document; the document and
    /// the ledger are written only after the last step succeeds.
    pub async fn up(&self) -> Result<UpOutcome> {
        self.run_up().instrument(info_span!("migrate.up")).await
    }

    /// Rolls back exactly the most recently applied migration.
    pub async fn down(&self) -> Result<DownOutcome> {
        self.run_down().instrument(info_span!("migrate.down")).await
    }

    pub fn status(&self) -> Result<MigrationStatus> {
        let definitions = self.registry.discover()?;
        let applied = self.ledger.load()?;
        let pending = pending_of(definitions, &applied);
        Ok(MigrationStatus { applied, pending })
    }

    async fn run_up(&self) -> Result<UpOutcome> {
        let definitions = self.registry.discover()?;
        let mut entries = self.ledger.load()?;
        let pending = pending_of(definitions, &entries);

        let Some(first) = pending.first() else {
            info!("no pending migrations");
            return Ok(UpOutcome::NoPending);
        };

        if let Some(last) = entries.last()
            && first.version < last.version
        {
            return Err(MigrateError::OutOfOrder {
                pending: first.name.clone(),
                applied: last.name.clone(),
            });
        }

        let mut document = self.store.load()?;
        let mut applied = Vec::with_capacity(pending.len());

        for definition in &pending {
            info!(migration = %definition.name, "applying migration");
            execute(definition, Direction::Up, &mut document).await?;

            let entry = LedgerEntry::new(&definition.version, &definition.name);
            entries.push(entry.clone());
            applied.push(entry);
            info!(migration = %definition.name, "migration applied");
        }

        let writes = vec![self.store.stage(&document)?, self.ledger.stage(&entries)?];
        commit_all(writes)?;

        info!(count = applied.len(), "all pending migrations applied");
        Ok(UpOutcome::Applied(applied))
    }

    async fn run_down(&self) -> Result<DownOutcome> {
        let mut entries = self.ledger.load()?;
        let Some(last) = entries.last().cloned() else {
            info!("no migrations to roll back");
            return Ok(DownOutcome::NothingToRollBack);
        };

        let definition = self
            .registry
            .discover()?
            .into_iter()
            .find(|definition| definition.name == last.name)
            .ok_or_else(|| MigrateError::MissingDefinition {
                name: last.name.clone(),
                version: last.version.clone(),
            })?;

        info!(migration = %definition.name, "rolling back migration");
        let mut document = self.store.load()?;
        execute(&definition, Direction::Down, &mut document).await?;
        entries.pop();

        let writes = vec![self.store.stage(&document)?, self.ledger.stage(&entries)?];
        commit_all(writes)?;

        info!(migration = %definition.name, "migration rolled back");
        Ok(DownOutcome::RolledBack(last))
    }
}

/// Registry definitions absent from the ledger, in registry order.
fn pending_of(
    definitions: Vec<MigrationDefinition>,
    entries: &[LedgerEntry],
) -> Vec<MigrationDefinition> {
    let applied = Ledger::applied_versions(entries);
    definitions
        .into_iter()
        .filter(|definition| !applied.contains(definition.version.as_str()))
        .collect()
}

async fn execute(
    definition: &MigrationDefinition,
    direction: Direction,
    document: &mut Document,
) -> Result<()> {
    definition.run(direction, document).await.map_err(|err| {
        error!(migration = %definition.name, %direction, error = %err, "migration failed");
        MigrateError::MigrationExecution {
            name: definition.name.clone(),
            direction,
            source: Box::new(err),
        }
    })
}
