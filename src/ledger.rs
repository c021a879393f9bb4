//! In-memory expense ledger
//!
//! Holds the ordered expense records and the monthly budget. Records are
//! append-only and bounded at [`MAX_EXPENSES`].

use crate::error::{FinanceError, FinanceResult};
use crate::models::Expense;

/// Maximum number of expenses a ledger can hold
pub const MAX_EXPENSES: usize = 1000;

/// The expense store: ordered expenses plus the monthly budget
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    expenses: Vec<Expense>,
    monthly_budget: f64,
}

impl Ledger {
    /// Create an empty ledger with a zero budget
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an expense
    ///
    /// Fails with [`FinanceError::CapacityExceeded`] once the ledger holds
    /// [`MAX_EXPENSES`] records; the ledger is left unchanged.
    pub fn add(
        &mut self,
        date: impl AsRef<str>,
        category: impl AsRef<str>,
        amount: f64,
    ) -> FinanceResult<&Expense> {
        self.push(Expense::new(date, category, amount))
    }

    /// Append an already-built expense, subject to the same capacity check as [`Ledger::add`]
    pub fn push(&mut self, expense: Expense) -> FinanceResult<&Expense> {
        if self.is_full() {
            return Err(FinanceError::CapacityExceeded {
                capacity: MAX_EXPENSES,
            });
        }
        self.expenses.push(expense);
        Ok(&self.expenses[self.expenses.len() - 1])
    }

    /// Overwrite the monthly budget
    pub fn set_budget(&mut self, value: f64) {
        self.monthly_budget = value;
    }

    pub fn monthly_budget(&self) -> f64 {
        self.monthly_budget
    }

    /// All expenses in insertion order
    pub fn all(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.expenses.len() >= MAX_EXPENSES
    }

    /// Sum of every expense amount
    pub fn total_amount(&self) -> f64 {
        self.expenses.iter().map(Expense::amount).sum()
    }

    /// Sum of the amounts recorded under exactly `name`
    pub fn category_amount(&self, name: &str) -> f64 {
        self.expenses
            .iter()
            .filter(|e| e.is_in_category(name))
            .map(Expense::amount)
            .sum()
    }
}
