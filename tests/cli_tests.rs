//! End-to-end tests driving the `docmigrate` binary

use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_docmigrate"))
        .arg("--dir")
        .arg(dir)
        .args(args)
        .output()
        .expect("failed to spawn docmigrate")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn read_db(dir: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(dir.join("db.json")).unwrap()).unwrap()
}

#[test]
fn test_cli_up_applies_all_migrations() {
    let temp_dir = TempDir::new().unwrap();
    assert!(run(temp_dir.path(), &["reset"]).status.success());

    let output = run(temp_dir.path(), &["up"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("003-add-createdAt"));

    let db = read_db(temp_dir.path());
    assert_eq!(
        db["schema"]["users"]["fields"],
        serde_json::json!(["id", "name", "email", "createdAt"])
    );
    assert_eq!(db["data"]["users"], serde_json::json!([]));

    let output = run(temp_dir.path(), &["up"]);
    assert!(stdout(&output).contains("No pending migrations."));
}

#[test]
fn test_cli_seed_reports_seeded_table() {
    let temp_dir = TempDir::new().unwrap();
    run(temp_dir.path(), &["reset"]);
    run(temp_dir.path(), &["up"]);

    let output = run(temp_dir.path(), &["seed"]);
    let text = stdout(&output);
    assert!(output.status.success());
    assert!(text.contains("Seeded") && text.contains("table 'users'"));

    let db = read_db(temp_dir.path());
    for row in db["data"]["users"].as_array().unwrap() {
        let mut keys: Vec<_> = row.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["createdAt", "email", "id", "name"]);
    }

    let output = run(temp_dir.path(), &["seed"]);
    assert!(stdout(&output).contains("already contains data. Skipping."));
}

#[test]
fn test_cli_down_rolls_back_last_migration() {
    let temp_dir = TempDir::new().unwrap();
    run(temp_dir.path(), &["reset"]);
    run(temp_dir.path(), &["up"]);

    let output = run(temp_dir.path(), &["down"]);
    let text = stdout(&output);
    assert!(text.contains("Rolling back migration") && text.contains("003-add-createdAt"));

    let db = read_db(temp_dir.path());
    assert_eq!(
        db["schema"]["users"]["fields"],
        serde_json::json!(["id", "name", "email"])
    );
}

#[test]
fn test_cli_down_with_empty_ledger() {
    let temp_dir = TempDir::new().unwrap();
    run(temp_dir.path(), &["reset"]);

    let output = run(temp_dir.path(), &["down"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No migrations to rollback."));
}

#[test]
fn test_cli_fails_without_document() {
    let temp_dir = TempDir::new().unwrap();

    let output = run(temp_dir.path(), &["up"]);
    assert!(!output.status.success());
    assert!(!temp_dir.path().join("migrations_history.json").exists());
}

#[test]
fn test_cli_status() {
    let temp_dir = TempDir::new().unwrap();
    run(temp_dir.path(), &["reset"]);
    run(temp_dir.path(), &["up"]);
    run(temp_dir.path(), &["down"]);

    let output = run(temp_dir.path(), &["status"]);
    let text = stdout(&output);
    assert!(text.contains("pending  003-add-createdAt"));
    assert!(text.contains("2 applied, 1 pending."));
}
