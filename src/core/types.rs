use crate::core::{MigrateError, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use serde_json::Value;

/// A single stored record. Field order is preserved as written.
pub type Row = serde_json::Map<String, Value>;

/// Seed input: table name to candidate rows, in file order.
pub type SeedSpecification = IndexMap<String, Vec<Row>>;

// ============================================================================
// Table Schema
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub fields: Vec<String>,
}

impl TableSchema {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Projects a row down to the declared fields, in declared order.
    ///
    /// Fields the row does not carry are left out rather than defaulted.
    pub fn project(&self, row: &Row) -> Row {
        self.fields
            .iter()
            .filter_map(|field| row.get(field).map(|value| (field.clone(), value.clone())))
            .collect()
    }
}

// ============================================================================
// Document
// ============================================================================

/// The whole persisted store: a `schema` section and a `data` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub schema: IndexMap<String, TableSchema>,
    #[serde(default)]
    pub data: IndexMap<String, Vec<Row>>,
}

impl Document {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn table_schema(&self, table: &str) -> Option<&TableSchema> {
        self.schema.get(table)
    }

    pub fn table_schema_mut(&mut self, table: &str) -> Result<&mut TableSchema> {
        self.schema
            .get_mut(table)
            .ok_or_else(|| MigrateError::TableNotFound(table.to_string()))
    }

    pub fn rows(&self, table: &str) -> Option<&[Row]> {
        self.data.get(table).map(Vec::as_slice)
    }

    pub fn rows_mut(&mut self, table: &str) -> Result<&mut Vec<Row>> {
        self.data
            .get_mut(table)
            .ok_or_else(|| MigrateError::TableNotFound(table.to_string()))
    }

    /// Declares a table and gives it an empty data section.
    pub fn create_table<I, S>(&mut self, table: &str, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema.insert(table.to_string(), TableSchema::new(fields));
        self.data.insert(table.to_string(), Vec::new());
    }

    /// Removes both the schema entry and the rows of a table.
    pub fn drop_table(&mut self, table: &str) {
        self.schema.shift_remove(table);
        self.data.shift_remove(table);
    }

    /// Appends `field` to the table schema and sets `default` on every row.
    pub fn add_field(&mut self, table: &str, field: &str, default: Value) -> Result<()> {
        let schema = self.table_schema_mut(table)?;
        if !schema.contains(field) {
            schema.fields.push(field.to_string());
        }

        if let Some(rows) = self.data.get_mut(table) {
            for row in rows.iter_mut() {
                row.insert(field.to_string(), default.clone());
            }
        }
        Ok(())
    }

    /// Removes `field` from the table schema and from every row.
    pub fn remove_field(&mut self, table: &str, field: &str) -> Result<()> {
        let schema = self.table_schema_mut(table)?;
        schema.fields.retain(|f| f != field);

        if let Some(rows) = self.data.get_mut(table) {
            for row in rows.iter_mut() {
                row.shift_remove(field);
            }
        }
        Ok(())
    }
}

// ============================================================================
// Ledger Entry
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub version: String,
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(version: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            name: name.into(),
            applied_at: Utc::now(),
        }
    }
}
