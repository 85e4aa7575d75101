//! Loads seed rows into empty tables, filtered by the current schema

use crate::config::MigrateConfig;
use crate::core::{Document, MigrateError, Result, Row, SeedSpecification, Value};
use crate::storage::{DocumentStore, read_json};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{info, info_span, warn};

/// What happened to one table of the seed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSeedOutcome {
    Seeded { table: String, rows: usize },
    /// The table is not declared in the document schema
    UnknownTable { table: String },
    /// The table already holds rows; seeding never merges
    AlreadyPopulated { table: String, rows: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub outcomes: Vec<TableSeedOutcome>,
}

impl SeedReport {
    pub fn seeded_rows(&self) -> usize {
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                TableSeedOutcome::Seeded { rows, .. } => *rows,
                _ => 0,
            })
            .sum()
    }

    pub fn skipped_tables(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| !matches!(outcome, TableSeedOutcome::Seeded { .. }))
            .count()
    }
}

pub struct Seeder {
    store: DocumentStore,
    seed_path: PathBuf,
}

impl Seeder {
    pub fn new(config: &MigrateConfig) -> Self {
        Self {
            store: DocumentStore::new(&config.document_path),
            seed_path: config.seed_path.clone(),
        }
    }

    pub fn seed_path(&self) -> &Path {
        &self.seed_path
    }

    /// Reads the seed file and the document, seeds every eligible table and
    /// writes the document back once.
    pub fn seed(&self) -> Result<SeedReport> {
        let _enter = info_span!("migrate.seed").entered();

        let specification: SeedSpecification = read_json(&self.seed_path)?
            .ok_or_else(|| MigrateError::read(&self.seed_path, "file does not exist"))?;
        let mut document = self.store.load()?;

        let report = apply_seed(&mut document, &specification);
        self.store.save(&document)?;

        info!(
            rows = report.seeded_rows(),
            skipped = report.skipped_tables(),
            "seeding finished"
        );
        Ok(report)
    }
}

/// Seeds `document` in memory, table by table in specification order.
pub fn apply_seed(document: &mut Document, specification: &SeedSpecification) -> SeedReport {
    let mut report = SeedReport::default();

    for (table, rows) in specification {
        let Some(schema) = document.schema.get(table) else {
            warn!(%table, "table does not exist in schema, skipping");
            report.outcomes.push(TableSeedOutcome::UnknownTable {
                table: table.clone(),
            });
            continue;
        };

        let existing = document.data.get(table).map_or(0, Vec::len);
        if existing > 0 {
            warn!(%table, rows = existing, "table already contains data, skipping");
            report.outcomes.push(TableSeedOutcome::AlreadyPopulated {
                table: table.clone(),
                rows: existing,
            });
            continue;
        }

        let projected: Vec<Row> = rows.iter().map(|row| schema.project(row)).collect();
        let count = projected.len();
        document.data.insert(table.clone(), projected);

        info!(%table, rows = count, "seeded table");
        report.outcomes.push(TableSeedOutcome::Seeded {
            table: table.clone(),
            rows: count,
        });
    }

    report
}

/// The dataset written by reset: two users carrying more fields than any
/// schema declares.
pub fn default_seed_specification() -> SeedSpecification {
    let users = json!([
        {
            "id": 1,
            "name": "Alice",
            "email": "alice@example.com",
            "createdAt": "2025-01-01T10:00:00.000Z",
            "age": 30,
            "phone": "555-1234"
        },
        {
            "id": 2,
            "name": "Bob",
            "email": "bob@example.com",
            "createdAt": "2025-01-02T12:00:00.000Z",
            "age": 25,
            "phone": "555-5678"
        }
    ]);

    let rows = match users {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(row) => Some(row),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    let mut specification = SeedSpecification::new();
    specification.insert("users".to_string(), rows);
    specification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TableSchema;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn users_document(fields: &[&str]) -> Document {
        let mut doc = Document::empty();
        doc.create_table("users", fields.iter().copied());
        doc
    }

    #[test]
    fn test_seed_filters_to_schema_fields() {
        let mut doc = users_document(&["id", "name", "email"]);
        let mut spec = SeedSpecification::new();
        spec.insert(
            "users".to_string(),
            vec![row(json!({"id": 1, "name": "A", "email": "a@x.com", "age": 30}))],
        );

        let report = apply_seed(&mut doc, &spec);

        assert_eq!(
            report.outcomes,
            vec![TableSeedOutcome::Seeded { table: "users".to_string(), rows: 1 }]
        );
        assert_eq!(
            Value::Object(doc.rows("users").unwrap()[0].clone()),
            json!({"id": 1, "name": "A", "email": "a@x.com"})
        );
    }

    #[test]
    fn test_seed_skips_unknown_table() {
        let mut doc = users_document(&["id"]);
        let mut spec = SeedSpecification::new();
        spec.insert("orders".to_string(), vec![row(json!({"id": 1}))]);
        spec.insert("users".to_string(), vec![row(json!({"id": 7}))]);

        let report = apply_seed(&mut doc, &spec);

        assert_eq!(
            report.outcomes[0],
            TableSeedOutcome::UnknownTable { table: "orders".to_string() }
        );
        assert!(!doc.data.contains_key("orders"));
        assert_eq!(doc.rows("users").unwrap().len(), 1);
    }

    #[test]
    fn test_seed_skips_populated_table() {
        let mut doc = users_document(&["id", "name"]);
        doc.rows_mut("users").unwrap().push(row(json!({"id": 1, "name": "Existing"})));

        let mut spec = SeedSpecification::new();
        spec.insert(
            "users".to_string(),
            vec![row(json!({"id": 2, "name": "B"})), row(json!({"id": 3, "name": "C"}))],
        );

        let report = apply_seed(&mut doc, &spec);

        assert_eq!(
            report.outcomes,
            vec![TableSeedOutcome::AlreadyPopulated { table: "users".to_string(), rows: 1 }]
        );
        assert_eq!(doc.rows("users").unwrap().len(), 1);
        assert_eq!(doc.rows("users").unwrap()[0]["name"], "Existing");
    }

    #[test]
    fn test_seed_fills_table_without_data_section() {
        let mut doc = Document::empty();
        doc.schema.insert("users".to_string(), TableSchema::new(["id"]));

        let mut spec = SeedSpecification::new();
        spec.insert("users".to_string(), vec![row(json!({"id": 1, "x": true}))]);

        apply_seed(&mut doc, &spec);
        assert_eq!(Value::Object(doc.rows("users").unwrap()[0].clone()), json!({"id": 1}));
    }

    #[test]
    fn test_default_seed_specification() {
        let spec = default_seed_specification();
        let users = &spec["users"];

        assert_eq!(users.len(), 2);
        assert_eq!(users[0]["name"], "Alice");
        assert_eq!(users[1]["phone"], "555-5678");
    }

    #[test]
    fn test_report_counts() {
        let report = SeedReport {
            outcomes: vec![
                TableSeedOutcome::Seeded { table: "a".to_string(), rows: 2 },
                TableSeedOutcome::UnknownTable { table: "b".to_string() },
                TableSeedOutcome::Seeded { table: "c".to_string(), rows: 3 },
            ],
        };
        assert_eq!(report.seeded_rows(), 5);
        assert_eq!(report.skipped_tables(), 1);
    }
}
