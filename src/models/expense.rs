//! Expense model
//!
//! A single dated, categorized outflow. Expenses are never edited once they
//! are recorded.

use serde::{Deserialize, Serialize};

/// Maximum length of the date field (`YYYY-MM-DD`)
pub const MAX_DATE_LEN: usize = 10;

/// Maximum length of the category field
pub const MAX_CATEGORY_LEN: usize = 49;

/// One recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    date: String,
    category: String,
    amount: f64,
}

impl Expense {
    /// Create an expense, truncating `date` and `category` to their maximum lengths
    ///
    /// The date is expected to look like `YYYY-MM-DD` but is not validated.
    pub fn new(date: impl AsRef<str>, category: impl AsRef<str>, amount: f64) -> Self {
        Self {
            date: truncate_chars(date.as_ref(), MAX_DATE_LEN),
            category: truncate_chars(category.as_ref(), MAX_CATEGORY_LEN),
            amount,
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Whether this expense belongs to `category` (exact, case-sensitive)
    pub fn is_in_category(&self, category: &str) -> bool {
        self.category == category
    }
}

/// Keep at most `max` characters of `s`
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
