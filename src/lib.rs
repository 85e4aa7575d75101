// ============================================================================
// docmigrate Library
// ============================================================================

pub mod config;
pub mod core;
pub mod engine;
pub mod migration;
pub mod reset;
pub mod seed;
pub mod storage;

// Re-export main types for convenience
pub use config::MigrateConfig;
pub use crate::core::{Document, LedgerEntry, MigrateError, Result, Row, SeedSpecification, TableSchema, Value};
pub use engine::{DownOutcome, MigrationEngine, MigrationStatus, UpOutcome};
pub use migration::{
    Direction, Migration, MigrationDefinition, MigrationRegistry, MigrationStep, builtin_registry,
};
pub use reset::reset;
pub use seed::{SeedReport, Seeder, TableSeedOutcome, apply_seed, default_seed_specification};
pub use storage::{DocumentStore, Ledger};
