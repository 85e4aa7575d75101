use crate::core::{Document, Result};
use crate::migration::Migration;
use async_trait::async_trait;
use std::sync::Arc;

/// A function that transforms the document in one direction.
pub type MigrationFn = Arc<dyn Fn(&mut Document) -> Result<()> + Send + Sync>;

/// A migration assembled from closures.
///
/// A direction without a closure leaves the document unchanged.
#[derive(Clone)]
pub struct MigrationStep {
    name: String,
    up: Option<MigrationFn>,
    down: Option<MigrationFn>,
}

impl std::fmt::Debug for MigrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationStep")
            .field("name", &self.name)
            .field("has_up", &self.up.is_some())
            .field("has_down", &self.down.is_some())
            .finish()
    }
}

impl MigrationStep {
    /// Creates a step named `<version>-<description>`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            up: None,
            down: None,
        }
    }

    /// Sets the forward transformation.
    pub fn with_up<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Document) -> Result<()> + Send + Sync + 'static,
    {
        self.up = Some(Arc::new(f));
        self
    }

    /// Sets the backward transformation.
    pub fn with_down<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Document) -> Result<()> + Send + Sync + 'static,
    {
        self.down = Some(Arc::new(f));
        self
    }
}

#[async_trait]
impl Migration for MigrationStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn up(&self, document: &mut Document) -> Result<()> {
        match &self.up {
            Some(f) => f(document),
            None => Ok(()),
        }
    }

    async fn down(&self, document: &mut Document) -> Result<()> {
        match &self.down {
            Some(f) => f(document),
            None => Ok(()),
        }
    }
}
