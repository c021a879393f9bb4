//! Interactive menu shell
//!
//! Drives the numbered menu: load at startup, loop over menu choices, save on
//! exit. The shell is generic over its input and output so it can run against
//! the terminal or against in-memory buffers.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::{FinancePaths, Settings};
use crate::display::format_expense_list;
use crate::error::{FinanceError, FinanceResult};
use crate::ledger::{Ledger, MAX_EXPENSES};
use crate::models::expense::truncate_chars;
use crate::models::{MAX_CATEGORY_LEN, MAX_DATE_LEN};
use crate::reports::FinancialReport;
use crate::storage::{load_ledger, save_ledger, DataSource, LoadOutcome};

/// A choice from the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddExpense,
    ViewExpenses,
    GenerateReport,
    SetBudget,
    SaveAndExit,
}

impl MenuChoice {
    /// Parse the numeric menu selection typed by the user
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().parse::<u32>().ok()? {
            1 => Some(Self::AddExpense),
            2 => Some(Self::ViewExpenses),
            3 => Some(Self::GenerateReport),
            4 => Some(Self::SetBudget),
            5 => Some(Self::SaveAndExit),
            _ => None,
        }
    }
}

/// States of the shell's main loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShellState {
    Menu,
    Add,
    View,
    Report,
    SetBudget,
    Exit,
}

/// The interactive session
pub struct Shell<R, W> {
    ledger: Ledger,
    data_file: PathBuf,
    settings: Settings,
    audit: Option<AuditLogger>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Create a shell over an already-loaded ledger
    pub fn new(ledger: Ledger, data_file: PathBuf, settings: Settings, input: R, output: W) -> Self {
        Self {
            ledger,
            data_file,
            settings,
            audit: None,
            input,
            output,
        }
    }

    /// Record mutations in `logger`
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Load the ledger from `paths`, report what was found, and build the shell
    pub fn open(
        paths: &FinancePaths,
        settings: Settings,
        input: R,
        mut output: W,
    ) -> FinanceResult<Self> {
        let outcome = load_ledger(paths.data_file())?;
        report_load(&outcome, &mut output)?;

        let audit_enabled = settings.audit_enabled;
        let shell = Self::new(outcome.ledger, paths.data_file(), settings, input, output);

        Ok(if audit_enabled {
            shell.with_audit(AuditLogger::new(paths.audit_log()))
        } else {
            shell
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Run the menu loop until the user saves and exits
    pub fn run(&mut self) -> FinanceResult<()> {
        let mut state = ShellState::Menu;

        while state != ShellState::Exit {
            state = match state {
                ShellState::Menu => self.menu()?,
                ShellState::Add => self.run_action(Self::add_expense)?,
                ShellState::View => self.run_action(Self::view_expenses)?,
                ShellState::Report => self.run_action(Self::generate_report)?,
                ShellState::SetBudget => self.run_action(Self::set_budget)?,
                ShellState::Exit => ShellState::Exit,
            };
        }

        Ok(())
    }

    fn menu(&mut self) -> FinanceResult<ShellState> {
        self.display_menu()?;

        let Some(line) = self.read_line()? else {
            // End of input: keep the session's changes
            writeln!(self.output)?;
            self.save()?;
            self.say_goodbye()?;
            return Ok(ShellState::Exit);
        };

        let next = match MenuChoice::parse(&line) {
            Some(MenuChoice::AddExpense) => ShellState::Add,
            Some(MenuChoice::ViewExpenses) => ShellState::View,
            Some(MenuChoice::GenerateReport) => ShellState::Report,
            Some(MenuChoice::SetBudget) => ShellState::SetBudget,
            Some(MenuChoice::SaveAndExit) => self.save_and_exit()?,
            None => {
                writeln!(self.output, "Invalid choice. Please try again.")?;
                ShellState::Menu
            }
        };

        Ok(next)
    }

    fn display_menu(&mut self) -> FinanceResult<()> {
        writeln!(self.output)?;
        writeln!(self.output, "=== Personal Finance Tracker ===")?;
        writeln!(self.output, "1. Add Expense")?;
        writeln!(self.output, "2. View Expenses")?;
        writeln!(self.output, "3. Generate Financial Report")?;
        writeln!(self.output, "4. Set Monthly Budget")?;
        writeln!(self.output, "5. Save and Exit")?;
        write!(self.output, "Enter your choice: ")?;
        self.output.flush()?;
        Ok(())
    }

    /// Run one action, reporting its error (if any) before returning to the menu
    fn run_action(&mut self, action: fn(&mut Self) -> FinanceResult<()>) -> FinanceResult<ShellState> {
        if let Err(e) = action(self) {
            writeln!(self.output, "{}", e)?;
        }
        Ok(ShellState::Menu)
    }

    fn add_expense(&mut self) -> FinanceResult<()> {
        if self.ledger.is_full() {
            return Err(FinanceError::CapacityExceeded {
                capacity: MAX_EXPENSES,
            });
        }

        let Some(date) = self.prompt("Enter date (YYYY-MM-DD): ")? else {
            return Ok(());
        };
        let date = capture_token(&date, "date", MAX_DATE_LEN)?;

        let Some(category) = self.prompt("Enter expense category: ")? else {
            return Ok(());
        };
        let category = capture_token(&category, "category", MAX_CATEGORY_LEN)?;

        let Some(amount) = self.prompt("Enter expense amount: ")? else {
            return Ok(());
        };
        let amount = parse_amount(&amount, "amount")?;

        let position = self.ledger.len() + 1;
        let expense = self.ledger.add(date, category, amount)?.clone();
        self.record(AuditEntry::create(
            EntityType::Expense,
            format!("expense-{}", position),
            &expense,
        ))?;

        writeln!(self.output, "Expense added successfully!")?;
        Ok(())
    }

    fn view_expenses(&mut self) -> FinanceResult<()> {
        let listing = format_expense_list(self.ledger.all(), &self.settings.currency_symbol);
        write!(self.output, "{}", listing)?;
        Ok(())
    }

    fn generate_report(&mut self) -> FinanceResult<()> {
        let report = FinancialReport::generate(&self.ledger, &self.settings.report_categories)?;
        write!(
            self.output,
            "{}",
            report.format_terminal(&self.settings.currency_symbol)
        )?;
        Ok(())
    }

    fn set_budget(&mut self) -> FinanceResult<()> {
        let prompt = format!("Enter monthly budget: {}", self.settings.currency_symbol);
        let Some(value) = self.prompt(&prompt)? else {
            return Ok(());
        };
        let value = parse_amount(&value, "budget")?;

        let before = self.ledger.monthly_budget();
        self.ledger.set_budget(value);
        self.record(AuditEntry::update(
            EntityType::Budget,
            "monthly-budget",
            &before,
            &value,
        ))?;

        writeln!(
            self.output,
            "Monthly budget set to {}{:.2}",
            self.settings.currency_symbol, value
        )?;
        Ok(())
    }

    /// Save, then exit; a failed save is reported and the menu comes back
    fn save_and_exit(&mut self) -> FinanceResult<ShellState> {
        match self.save() {
            Ok(()) => {
                self.say_goodbye()?;
                Ok(ShellState::Exit)
            }
            Err(e) => {
                writeln!(self.output, "Error saving expenses: {}", e)?;
                Ok(ShellState::Menu)
            }
        }
    }

    fn save(&mut self) -> FinanceResult<()> {
        save_ledger(&self.data_file, &self.ledger)?;
        self.record(AuditEntry::save(
            self.data_file.display().to_string(),
            &serde_json::json!({
                "expenses": self.ledger.len(),
                "monthly_budget": self.ledger.monthly_budget(),
            }),
        ))?;
        writeln!(self.output, "Expenses saved successfully.")?;
        Ok(())
    }

    fn say_goodbye(&mut self) -> FinanceResult<()> {
        writeln!(self.output, "Exiting Personal Finance Tracker. Goodbye!")?;
        Ok(())
    }

    /// Append to the audit log; a failure is only a warning
    fn record(&mut self, entry: AuditEntry) -> FinanceResult<()> {
        if let Some(logger) = &self.audit {
            if let Err(e) = logger.log(&entry) {
                writeln!(self.output, "Warning: audit log not updated: {}", e)?;
            }
        }
        Ok(())
    }

    fn prompt(&mut self, message: &str) -> FinanceResult<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        self.read_line()
    }

    /// Read one line; `None` at end of input
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected, so a
    /// garbled line is handled like any other unrecognized input.
    fn read_line(&mut self) -> FinanceResult<Option<String>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

/// Print what loading found, the way the session greets the user
pub fn report_load<W: Write>(outcome: &LoadOutcome, output: &mut W) -> FinanceResult<()> {
    match outcome.source {
        DataSource::NoPreviousData => {
            writeln!(output, "No previous data found.")?;
            return Ok(());
        }
        DataSource::File => {
            writeln!(
                output,
                "Previous data loaded. {} expenses found.",
                outcome.ledger.len()
            )?;
        }
    }

    if !outcome.budget_line_valid {
        writeln!(
            output,
            "Warning: budget line missing or malformed; monthly budget set to 0.00."
        )?;
    }
    if let Some(line) = outcome.stopped_at_line {
        writeln!(
            output,
            "Warning: stopped reading at malformed line {}; later records were not loaded.",
            line
        )?;
    }
    if outcome.truncated_at_capacity {
        writeln!(
            output,
            "Warning: only the first {} expenses were loaded.",
            MAX_EXPENSES
        )?;
    }
    Ok(())
}

/// First whitespace-delimited token of `input`, truncated to `max_len` characters
fn capture_token(input: &str, field: &str, max_len: usize) -> FinanceResult<String> {
    let token = input.split_whitespace().next().unwrap_or("");
    if token.is_empty() {
        return Err(FinanceError::Validation(format!("{} must not be empty", field)));
    }
    if token.contains(',') {
        return Err(FinanceError::Validation(format!(
            "{} must not contain commas",
            field
        )));
    }
    Ok(truncate_chars(token, max_len))
}

fn parse_amount(input: &str, field: &str) -> FinanceResult<f64> {
    let token = input.split_whitespace().next().unwrap_or("");
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FinanceError::Validation(format!(
            "{} must be a number, got '{}'",
            field, token
        ))),
    }
}
