//! Line-oriented text encoding of the ledger
//!
//! ```text
//! Budget:<budget:.2>
//! <date>,<category>,<amount:.2>
//! ```
//!
//! Writes go to a temporary sibling file which is then renamed over the
//! target, so a failed save never leaves a half-written ledger behind.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{FinanceError, FinanceResult};
use crate::ledger::{Ledger, MAX_EXPENSES};
use crate::models::{Expense, MAX_CATEGORY_LEN, MAX_DATE_LEN};

const BUDGET_PREFIX: &str = "Budget:";

/// Where the loaded ledger came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// No data file existed; the ledger starts empty
    NoPreviousData,
    /// The ledger was read from the data file
    File,
}

/// Result of loading a ledger, including what was tolerated along the way
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub ledger: Ledger,
    pub source: DataSource,
    /// False when the header line was missing or malformed (budget left at 0)
    pub budget_line_valid: bool,
    /// 1-based line number of the first malformed record, which ended parsing
    pub stopped_at_line: Option<usize>,
    /// True when parsing ended because the ledger reached capacity
    pub truncated_at_capacity: bool,
}

impl LoadOutcome {
    fn empty() -> Self {
        Self {
            ledger: Ledger::new(),
            source: DataSource::NoPreviousData,
            budget_line_valid: true,
            stopped_at_line: None,
            truncated_at_capacity: false,
        }
    }
}

/// Write the ledger to `path`, replacing any existing content
pub fn save_ledger<P: AsRef<Path>>(path: P, ledger: &Ledger) -> FinanceResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                FinanceError::Io(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let temp_path = path.with_extension("txt.tmp");

    let file = File::create(&temp_path).map_err(|e| {
        FinanceError::Io(format!("Failed to open {} for writing: {}", temp_path.display(), e))
    })?;

    let mut writer = BufWriter::new(file);
    if let Err(e) = write_ledger(&mut writer, ledger).and_then(|_| writer.flush()) {
        let _ = fs::remove_file(&temp_path);
        return Err(FinanceError::Io(format!("Failed to write ledger: {}", e)));
    }

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| FinanceError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        FinanceError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// Encode the ledger into `writer`
pub fn write_ledger<W: Write>(writer: &mut W, ledger: &Ledger) -> std::io::Result<()> {
    writeln!(writer, "{}{:.2}", BUDGET_PREFIX, ledger.monthly_budget())?;
    for expense in ledger.all() {
        writeln!(
            writer,
            "{},{},{:.2}",
            expense.date(),
            expense.category(),
            expense.amount()
        )?;
    }
    Ok(())
}

/// Load the ledger stored at `path`
///
/// A missing file is not an error: the outcome carries an empty ledger and
/// [`DataSource::NoPreviousData`].
pub fn load_ledger<P: AsRef<Path>>(path: P) -> FinanceResult<LoadOutcome> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(LoadOutcome::empty());
    }

    let file = File::open(path)
        .map_err(|e| FinanceError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    read_ledger(BufReader::new(file))
}

/// Decode a ledger from `reader`
///
/// The first line is the budget header only when it starts with `Budget:`;
/// otherwise it is read as the first record. Parsing stops at the first
/// malformed record line (including one that is not valid UTF-8) or once the
/// ledger is full; everything read up to that point is kept.
pub fn read_ledger<R: BufRead>(mut reader: R) -> FinanceResult<LoadOutcome> {
    let mut outcome = LoadOutcome::empty();
    outcome.source = DataSource::File;

    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;
        let line = std::str::from_utf8(&buf).ok();

        if line_no == 1 {
            if buf.starts_with(BUDGET_PREFIX.as_bytes()) {
                match line.and_then(parse_budget_line) {
                    Some(budget) => outcome.ledger.set_budget(budget),
                    None => outcome.budget_line_valid = false,
                }
                continue;
            }
            outcome.budget_line_valid = false;
        }

        if matches!(line, Some(l) if l.trim().is_empty()) {
            continue;
        }

        if outcome.ledger.len() >= MAX_EXPENSES {
            outcome.truncated_at_capacity = true;
            break;
        }

        match line.and_then(parse_record_line) {
            Some(expense) => {
                outcome.ledger.push(expense)?;
            }
            None => {
                outcome.stopped_at_line = Some(line_no);
                break;
            }
        }
    }

    Ok(outcome)
}

fn parse_budget_line(line: &str) -> Option<f64> {
    line.trim()
        .strip_prefix(BUDGET_PREFIX)?
        .trim()
        .parse::<f64>()
        .ok()
}

fn parse_record_line(line: &str) -> Option<Expense> {
    let line = line.trim_start().trim_end_matches(['\r', '\n']);
    let mut fields = line.split(',');
    let date = fields.next()?;
    let category = fields.next()?;
    let amount = fields.next()?;
    if fields.next().is_some() {
        return None;
    }

    let date_len = date.chars().count();
    let category_len = category.chars().count();
    if date_len == 0 || date_len > MAX_DATE_LEN {
        return None;
    }
    if category_len == 0 || category_len > MAX_CATEGORY_LEN {
        return None;
    }

    let amount = amount.trim().parse::<f64>().ok()?;
    Some(Expense::new(date, category, amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.set_budget(500.0);
        ledger.add("2025-01-03", "Food", 10.0).unwrap();
        ledger.add("2025-01-04", "Transport", 2.456).unwrap();
        ledger.add("2025-01-05", "Food", 5.5).unwrap();
        ledger
    }

    #[test]
    fn test_write_format() {
        let mut out = Vec::new();
        write_ledger(&mut out, &sample_ledger()).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Budget:500.00\n2025-01-03,Food,10.00\n2025-01-04,Transport,2.46\n2025-01-05,Food,5.50\n"
        );
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let outcome = load_ledger(temp_dir.path().join("finance_data.txt")).unwrap();

        assert_eq!(outcome.source, DataSource::NoPreviousData);
        assert!(outcome.ledger.is_empty());
        assert_eq!(outcome.ledger.monthly_budget(), 0.0);
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("finance_data.txt");

        save_ledger(&path, &sample_ledger()).unwrap();
        assert!(!temp_dir.path().join("finance_data.txt.tmp").exists());

        let outcome = load_ledger(&path).unwrap();
        assert_eq!(outcome.source, DataSource::File);
        assert!(outcome.budget_line_valid);
        assert_eq!(outcome.stopped_at_line, None);

        let ledger = outcome.ledger;
        assert_eq!(ledger.monthly_budget(), 500.0);
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.all()[1].category(), "Transport");
        assert_eq!(ledger.all()[1].amount(), 2.46);
        assert_eq!(ledger.all()[2].date(), "2025-01-05");
    }

    #[test]
    fn test_save_truncates_existing_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("finance_data.txt");
        fs::write(&path, "Budget:1.00\n".to_string() + &"2025-01-01,Old,1.00\n".repeat(20))
            .unwrap();

        let mut ledger = Ledger::new();
        ledger.add("2025-02-01", "New", 3.0).unwrap();
        save_ledger(&path, &ledger).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Budget:0.00\n2025-02-01,New,3.00\n"
        );
    }

    #[test]
    fn test_save_into_unwritable_location_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = save_ledger(blocker.join("finance_data.txt"), &sample_ledger()).unwrap_err();
        assert!(matches!(err, FinanceError::Io(_)));
    }

    #[test]
    fn test_malformed_budget_line_defaults_to_zero() {
        let input = "Budget:abc\n2025-01-01,Food,4.00\n";
        let outcome = read_ledger(Cursor::new(input)).unwrap();

        assert!(!outcome.budget_line_valid);
        assert_eq!(outcome.ledger.monthly_budget(), 0.0);
        assert_eq!(outcome.ledger.len(), 1);
    }

    #[test]
    fn test_malformed_record_stops_parsing() {
        let input = "Budget:10.00\n\
                     2025-01-01,Food,4.00\n\
                     not a record\n\
                     2025-01-02,Food,6.00\n";
        let outcome = read_ledger(Cursor::new(input)).unwrap();

        assert_eq!(outcome.ledger.len(), 1);
        assert_eq!(outcome.stopped_at_line, Some(3));
        assert_eq!(outcome.ledger.monthly_budget(), 10.0);
    }

    #[test]
    fn test_record_field_rules() {
        assert!(parse_record_line("2025-01-01,Food,4.00").is_some());
        assert!(parse_record_line("2025-01-01,Food,4.00\r\n").is_some());
        assert!(parse_record_line("  2025-01-01,Food,4.00").is_some());
        assert!(parse_record_line("2025-01-01,Food").is_none());
        assert!(parse_record_line("2025-01-01,Food,4.00,extra").is_none());
        assert!(parse_record_line(",Food,4.00").is_none());
        assert!(parse_record_line("2025-01-01-01,Food,4.00").is_none());
        assert!(parse_record_line(&format!("2025-01-01,{},4.00", "c".repeat(50))).is_none());
        assert!(parse_record_line("2025-01-01,Food,four").is_none());
    }

    #[test]
    fn test_headerless_file_keeps_first_record() {
        let input = "2025-01-01,Food,4.00\n2025-01-02,Food,6.00\n";
        let outcome = read_ledger(Cursor::new(input)).unwrap();

        assert!(!outcome.budget_line_valid);
        assert_eq!(outcome.ledger.monthly_budget(), 0.0);
        assert_eq!(outcome.ledger.len(), 2);
        assert_eq!(outcome.ledger.all()[0].amount(), 4.0);
    }

    #[test]
    fn test_invalid_utf8_record_stops_parsing() {
        let input: &[u8] = b"Budget:10.00\n2025-01-01,Food,1.00\n2025-01-02,Caf\xe9,2.00\n";
        let outcome = read_ledger(Cursor::new(input)).unwrap();

        assert_eq!(outcome.ledger.len(), 1);
        assert_eq!(outcome.stopped_at_line, Some(3));
        assert_eq!(outcome.ledger.monthly_budget(), 10.0);
    }

    #[test]
    fn test_invalid_utf8_budget_line() {
        let input: &[u8] = b"Budget:\xff\n2025-01-01,Food,1.00\n";
        let outcome = read_ledger(Cursor::new(input)).unwrap();

        assert!(!outcome.budget_line_valid);
        assert_eq!(outcome.ledger.monthly_budget(), 0.0);
        assert_eq!(outcome.ledger.len(), 1);
    }

    #[test]
    fn test_indented_record_line() {
        let input = "Budget:0.00\n   2025-01-01,Food,1.00\n\t2025-01-02,Food,2.00\n";
        let outcome = read_ledger(Cursor::new(input)).unwrap();

        assert_eq!(outcome.ledger.len(), 2);
        assert_eq!(outcome.ledger.all()[0].date(), "2025-01-01");
        assert_eq!(outcome.stopped_at_line, None);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let input = "Budget:0.00\n\n2025-01-01,Food,1.00\n\n2025-01-02,Food,2.00\n";
        let outcome = read_ledger(Cursor::new(input)).unwrap();
        assert_eq!(outcome.ledger.len(), 2);
        assert_eq!(outcome.stopped_at_line, None);
    }

    #[test]
    fn test_load_stops_at_capacity() {
        let mut input = String::from("Budget:0.00\n");
        for _ in 0..(MAX_EXPENSES + 5) {
            input.push_str("2025-01-01,Food,1.00\n");
        }
        let outcome = read_ledger(Cursor::new(input)).unwrap();

        assert_eq!(outcome.ledger.len(), MAX_EXPENSES);
        assert!(outcome.truncated_at_capacity);
    }

    #[test]
    fn test_empty_file() {
        let outcome = read_ledger(Cursor::new("")).unwrap();
        assert_eq!(outcome.source, DataSource::File);
        assert!(outcome.ledger.is_empty());
    }
}
