//! Reports module for the finance tracker
//!
//! Derives totals, budget status and category breakdowns from the ledger.

pub mod financial;

pub use financial::{BudgetStatus, CategoryBreakdown, FinancialReport};
