//! Core data models for the finance tracker

pub mod expense;

pub use expense::{Expense, MAX_CATEGORY_LEN, MAX_DATE_LEN};
