pub mod atomic;
pub mod document_store;
pub mod ledger;

pub use atomic::{StagedWrite, commit_all, read_json, write_json};
pub use document_store::DocumentStore;
pub use ledger::Ledger;
