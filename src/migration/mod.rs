//! Migration definitions and the registry that orders them
//!
//! - `step.rs` - closure-backed migrations built fluently
//! - `registry.rs` - explicit manifest, version extraction and ordering
//! - `builtin.rs` - the migrations shipped with the binary

mod builtin;
mod registry;
mod step;

pub use builtin::{AddCreatedAt, AddEmail, CreateUsers, builtin_registry};
pub use registry::{MigrationRegistry, version_of};
pub use step::{MigrationFn, MigrationStep};

use crate::core::{Document, Result};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// A named, reversible transformation of the document.
///
/// The name follows `<version>-<description>`; the registry derives the
/// version from it. Both directions mutate the document in place and may
/// suspend, but the engine always awaits one before starting the next.
#[async_trait]
pub trait Migration: Send + Sync {
    fn name(&self) -> &str;

    async fn up(&self, document: &mut Document) -> Result<()>;

    async fn down(&self, document: &mut Document) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A registered migration together with its parsed version.
#[derive(Clone)]
pub struct MigrationDefinition {
    pub version: String,
    pub name: String,
    pub(crate) migration: Arc<dyn Migration>,
}

impl MigrationDefinition {
    pub fn migration(&self) -> &dyn Migration {
        self.migration.as_ref()
    }

    pub(crate) async fn run(&self, direction: Direction, document: &mut Document) -> Result<()> {
        match direction {
            Direction::Up => self.migration.up(document).await,
            Direction::Down => self.migration.down(document).await,
        }
    }
}

impl fmt::Debug for MigrationDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationDefinition")
            .field("version", &self.version)
            .field("name", &self.name)
            .finish()
    }
}
