use crate::config::MigrateConfig;
use crate::core::{Document, LedgerEntry, Result};
use crate::seed::default_seed_specification;
use crate::storage::write_json;
use tracing::info;

/// Restores the document, the ledger and the seed file to their initial
/// states: an empty document, an empty ledger and the default seed dataset.
pub fn reset(config: &MigrateConfig) -> Result<()> {
    write_json(&config.document_path, &Document::empty())?;
    write_json(&config.ledger_path, &Vec::<LedgerEntry>::new())?;
    write_json(&config.seed_path, &default_seed_specification())?;

    info!(
        document = %config.document_path.display(),
        ledger = %config.ledger_path.display(),
        seed = %config.seed_path.display(),
        "reset complete"
    );
    Ok(())
}
