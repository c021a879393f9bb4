//! Storage layer for the finance tracker
//!
//! Persists the ledger as a flat text file with atomic writes.

pub mod text_file;

pub use text_file::{load_ledger, read_ledger, save_ledger, write_ledger, DataSource, LoadOutcome};
