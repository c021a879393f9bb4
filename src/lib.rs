//! Finance Tracker - Terminal-based personal expense tracker
//!
//! This library records dated, categorized expenses, persists them to a flat
//! text file, and derives budget-vs-actual reports against a monthly budget.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Data directory and user settings
//! - `error`: Custom error types
//! - `models`: The expense record
//! - `ledger`: In-memory expense store with its capacity bound
//! - `storage`: Text file persistence
//! - `reports`: Financial report generation
//! - `display`: Terminal formatting
//! - `audit`: Audit logging system
//! - `shell`: The interactive menu
//!
//! # Example
//!
//! ```rust,ignore
//! use finance_tracker::config::{FinancePaths, Settings};
//! use finance_tracker::shell::Shell;
//!
//! let paths = FinancePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! Shell::open(&paths, settings, std::io::stdin().lock(), std::io::stdout())?.run()?;
//! ```

pub mod audit;
pub mod config;
pub mod display;
pub mod error;
pub mod ledger;
pub mod models;
pub mod reports;
pub mod shell;
pub mod storage;

pub use error::{FinanceError, FinanceResult};
pub use ledger::{Ledger, MAX_EXPENSES};
pub use models::Expense;
