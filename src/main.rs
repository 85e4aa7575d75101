use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docmigrate::{
    DownOutcome, MigrateConfig, MigrationEngine, Seeder, TableSeedOutcome, UpOutcome,
    builtin_registry,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docmigrate")]
#[command(about = "Migrations and seeding for a single-file JSON document store")]
struct Cli {
    /// Directory holding db.json, migrations_history.json and seeds/
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[arg(long, global = true)]
    document: Option<PathBuf>,

    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    #[arg(long = "seed-file", global = true)]
    seed_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply pending migrations
    Up,
    /// Roll back the last migration
    Down,
    /// Seed the database (filtered by current schema)
    Seed,
    /// Show applied and pending migrations
    Status,
    /// Restore the document, the ledger and the seed file to their initial states
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = config_from(&cli);

    match cli.command {
        Command::Up => migrate_up(&config).await,
        Command::Down => migrate_down(&config).await,
        Command::Seed => seed(&config),
        Command::Status => status(&config),
        Command::Reset => {
            docmigrate::reset(&config).context("Reset failed")?;
            println!(
                "Reset complete: {}, {} and {} restored to initial states.",
                config.document_path.display(),
                config.ledger_path.display(),
                config.seed_path.display()
            );
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn config_from(cli: &Cli) -> MigrateConfig {
    let mut config = match &cli.dir {
        Some(dir) => MigrateConfig::in_dir(dir),
        None => MigrateConfig::from_env(),
    };

    if let Some(path) = &cli.document {
        config = config.document_path(path);
    }
    if let Some(path) = &cli.ledger {
        config = config.ledger_path(path);
    }
    if let Some(path) = &cli.seed_file {
        config = config.seed_path(path);
    }
    config
}

async fn migrate_up(config: &MigrateConfig) -> Result<()> {
    let engine = MigrationEngine::new(config, builtin_registry());

    match engine.up().await.context("Migration up aborted, nothing was written")? {
        UpOutcome::NoPending => println!("No pending migrations."),
        UpOutcome::Applied(entries) => {
            for entry in &entries {
                println!("Applied migration: {}", entry.name);
            }
            println!("All migrations have been applied ({}).", entries.len());
        }
    }
    Ok(())
}

async fn migrate_down(config: &MigrateConfig) -> Result<()> {
    let engine = MigrationEngine::new(config, builtin_registry());

    match engine.down().await.context("Rollback aborted, nothing was written")? {
        DownOutcome::NothingToRollBack => println!("No migrations to rollback."),
        DownOutcome::RolledBack(entry) => {
            println!("Rolling back migration: {}.", entry.name);
            println!("Rolled back migration {}.", entry.name);
        }
    }
    Ok(())
}

fn seed(config: &MigrateConfig) -> Result<()> {
    println!("Seeding data...");
    let report = Seeder::new(config)
        .seed()
        .context("Seeding aborted, nothing was written")?;

    for outcome in &report.outcomes {
        match outcome {
            TableSeedOutcome::Seeded { table, rows } => {
                println!("Seeded {} rows into table '{}'.", rows, table)
            }
            TableSeedOutcome::UnknownTable { table } => {
                println!("Table '{}' does not exist in schema. Skipping.", table)
            }
            TableSeedOutcome::AlreadyPopulated { table, .. } => {
                println!("Table '{}' already contains data. Skipping.", table)
            }
        }
    }
    println!(
        "Seeding finished: {} rows inserted, {} tables skipped.",
        report.seeded_rows(),
        report.skipped_tables()
    );
    Ok(())
}

fn status(config: &MigrateConfig) -> Result<()> {
    let engine = MigrationEngine::new(config, builtin_registry());
    let status = engine.status().context("Failed to read migration status")?;

    for entry in &status.applied {
        println!("applied  {}  ({})", entry.name, entry.applied_at.to_rfc3339());
    }
    for definition in &status.pending {
        println!("pending  {}", definition.name);
    }
    println!(
        "{} applied, {} pending.",
        status.applied.len(),
        status.pending.len()
    );
    Ok(())
}
