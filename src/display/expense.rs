//! Expense display formatting

use crate::models::Expense;

/// Format a single expense as a numbered line (`index` is 1-based)
pub fn format_expense_line(index: usize, expense: &Expense, currency: &str) -> String {
    format!(
        "{}. Date: {} | Category: {} | Amount: {}{:.2}",
        index,
        expense.date(),
        expense.category(),
        currency,
        expense.amount()
    )
}

/// Format all expenses for terminal display, in ledger order
pub fn format_expense_list(expenses: &[Expense], currency: &str) -> String {
    if expenses.is_empty() {
        return "No expenses recorded.\n".to_string();
    }

    let mut output = String::from("\n=== Recorded Expenses ===\n");
    for (i, expense) in expenses.iter().enumerate() {
        output.push_str(&format_expense_line(i + 1, expense, currency));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list() {
        assert_eq!(format_expense_list(&[], "$"), "No expenses recorded.\n");
    }

    #[test]
    fn test_list_lines() {
        let expenses = vec![
            Expense::new("2025-01-01", "Food", 10.0),
            Expense::new("2025-01-02", "Transport", 2.346),
        ];
        let output = format_expense_list(&expenses, "$");

        assert!(output.starts_with("\n=== Recorded Expenses ===\n"));
        assert!(output.contains("1. Date: 2025-01-01 | Category: Food | Amount: $10.00\n"));
        assert!(output.contains("2. Date: 2025-01-02 | Category: Transport | Amount: $2.35\n"));
    }
}
