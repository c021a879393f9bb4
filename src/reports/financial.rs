//! Financial Report
//!
//! Budget-vs-actual status plus a per-category breakdown over a configured,
//! ordered list of categories.

use std::io::Write;

use crate::error::{FinanceError, FinanceResult};
use crate::ledger::Ledger;

/// Where spending stands against the monthly budget
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BudgetStatus {
    /// Spending is within budget; carries the remaining amount (>= 0)
    OnTrack { remaining: f64 },
    /// Spending exceeded the budget; carries the overrun (> 0)
    Exceeded { overrun: f64 },
}

impl BudgetStatus {
    fn from_remaining(remaining: f64) -> Self {
        if remaining >= 0.0 {
            Self::OnTrack { remaining }
        } else {
            Self::Exceeded {
                overrun: -remaining,
            }
        }
    }

    pub fn is_exceeded(&self) -> bool {
        matches!(self, Self::Exceeded { .. })
    }

    /// Label shown in terminal output
    pub fn label(&self) -> &'static str {
        match self {
            Self::OnTrack { .. } => "ON TRACK",
            Self::Exceeded { .. } => "EXCEEDED",
        }
    }
}

/// Spending for one reported category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    pub category: String,
    pub total: f64,
    /// Share of total expenses, 0 when total expenses are 0
    pub percentage: f64,
}

/// Financial Report
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialReport {
    pub total_expenses: f64,
    pub monthly_budget: f64,
    pub status: BudgetStatus,
    pub categories: Vec<CategoryBreakdown>,
}

impl FinancialReport {
    /// Generate a report over `categories`, in the order given
    ///
    /// Fails with [`FinanceError::NothingToReport`] when the ledger is empty.
    /// Expenses in categories not listed only count toward the total.
    pub fn generate<S: AsRef<str>>(ledger: &Ledger, categories: &[S]) -> FinanceResult<Self> {
        if ledger.is_empty() {
            return Err(FinanceError::NothingToReport);
        }

        let total_expenses = ledger.total_amount();
        let monthly_budget = ledger.monthly_budget();

        let categories = categories
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let total = ledger.category_amount(name);
                CategoryBreakdown {
                    category: name.to_string(),
                    total,
                    percentage: percentage_of(total, total_expenses),
                }
            })
            .collect();

        Ok(Self {
            total_expenses,
            monthly_budget,
            status: BudgetStatus::from_remaining(monthly_budget - total_expenses),
            categories,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str("\n=== Financial Report ===\n");
        output.push_str(&format!(
            "Total Expenses: {}{:.2}\n",
            currency, self.total_expenses
        ));
        output.push_str(&format!(
            "Monthly Budget: {}{:.2}\n",
            currency, self.monthly_budget
        ));

        match self.status {
            BudgetStatus::OnTrack { remaining } => {
                output.push_str(&format!("Remaining Budget: {}{:.2}\n", currency, remaining));
            }
            BudgetStatus::Exceeded { overrun } => {
                output.push_str(&format!("Budget Overrun: {}{:.2}\n", currency, overrun));
            }
        }
        output.push_str(&format!("Budget Status: {}\n", self.status.label()));

        output.push_str("\n=== Category-wise Expenses ===\n");
        for row in &self.categories {
            output.push_str(&format!(
                "{}: {}{:.2} ({:.2}%)\n",
                row.category, currency, row.total, row.percentage
            ));
        }

        output
    }

    /// Export the category breakdown to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> FinanceResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        wtr.write_record(["Category", "Amount", "Percentage"])?;
        for row in &self.categories {
            wtr.write_record([
                row.category.clone(),
                format!("{:.2}", row.total),
                format!("{:.2}", row.percentage),
            ])?;
        }
        wtr.write_record([
            "TOTAL".to_string(),
            format!("{:.2}", self.total_expenses),
            String::new(),
        ])?;

        wtr.flush()
            .map_err(|e| FinanceError::Export(format!("Failed to flush CSV: {}", e)))?;
        Ok(())
    }
}

fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}
