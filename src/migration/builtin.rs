use crate::core::{Document, Result, Value};
use crate::migration::{Migration, MigrationRegistry};
use async_trait::async_trait;

const USERS: &str = "users";

/// Creates the `users` table with `id` and `name`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateUsers;

#[async_trait]
impl Migration for CreateUsers {
    fn name(&self) -> &str {
        "001-create-users"
    }

    async fn up(&self, document: &mut Document) -> Result<()> {
        document.create_table(USERS, ["id", "name"]);
        Ok(())
    }

    async fn down(&self, document: &mut Document) -> Result<()> {
        document.drop_table(USERS);
        Ok(())
    }
}

/// Adds a nullable `email` to `users`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddEmail;

#[async_trait]
impl Migration for AddEmail {
    fn name(&self) -> &str {
        "002-add-email"
    }

    async fn up(&self, document: &mut Document) -> Result<()> {
        document.add_field(USERS, "email", Value::Null)
    }

    async fn down(&self, document: &mut Document) -> Result<()> {
        document.remove_field(USERS, "email")
    }
}

/// Adds a nullable `createdAt` to `users`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddCreatedAt;

#[async_trait]
impl Migration for AddCreatedAt {
    fn name(&self) -> &str {
        "003-add-createdAt"
    }

    async fn up(&self, document: &mut Document) -> Result<()> {
        document.add_field(USERS, "createdAt", Value::Null)
    }

    async fn down(&self, document: &mut Document) -> Result<()> {
        document.remove_field(USERS, "createdAt")
    }
}

/// The migrations shipped with the `docmigrate` binary.
pub fn builtin_registry() -> MigrationRegistry {
    MigrationRegistry::new()
        .with(CreateUsers)
        .with(AddEmail)
        .with(AddCreatedAt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MigrateError;
    use serde_json::json;

    fn populated() -> Document {
        let mut doc = Document::empty();
        doc.create_table(USERS, ["id", "name"]);
        let row = json!({"id": 1, "name": "Alice"});
        if let Value::Object(row) = row {
            doc.rows_mut(USERS).unwrap().push(row);
        }
        doc
    }

    #[tokio::test]
    async fn test_create_users_round_trip() {
        let before = Document::empty();
        let mut doc = before.clone();

        CreateUsers.up(&mut doc).await.unwrap();
        assert_eq!(doc.table_schema(USERS).unwrap().fields, vec!["id", "name"]);
        assert_eq!(doc.rows(USERS).unwrap().len(), 0);

        CreateUsers.down(&mut doc).await.unwrap();
        assert_eq!(doc, before);
    }

    #[tokio::test]
    async fn test_add_email_round_trip() {
        let before = populated();
        let mut doc = before.clone();

        AddEmail.up(&mut doc).await.unwrap();
        assert_eq!(doc.table_schema(USERS).unwrap().fields, vec!["id", "name", "email"]);
        assert_eq!(doc.rows(USERS).unwrap()[0]["email"], Value::Null);

        AddEmail.down(&mut doc).await.unwrap();
        assert_eq!(doc, before);
    }

    #[tokio::test]
    async fn test_add_created_at_round_trip() {
        let before = populated();
        let mut doc = before.clone();

        AddCreatedAt.up(&mut doc).await.unwrap();
        assert!(doc.table_schema(USERS).unwrap().contains("createdAt"));

        AddCreatedAt.down(&mut doc).await.unwrap();
        assert_eq!(doc, before);
    }

    #[tokio::test]
    async fn test_add_email_requires_users_table() {
        let mut doc = Document::empty();
        let err = AddEmail.up(&mut doc).await.unwrap_err();
        assert!(matches!(err, MigrateError::TableNotFound(_)));
    }

    #[test]
    fn test_builtin_registry_order() {
        let names: Vec<_> = builtin_registry()
            .discover()
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["001-create-users", "002-add-email", "003-add-createdAt"]);
    }
}
