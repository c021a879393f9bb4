use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use finance_tracker::audit::AuditLogger;
use finance_tracker::config::{FinancePaths, Settings};
use finance_tracker::display::format_expense_list;
use finance_tracker::reports::FinancialReport;
use finance_tracker::shell::{report_load, Shell};
use finance_tracker::storage::load_ledger;
use finance_tracker::FinanceError;

#[derive(Parser)]
#[command(
    name = "finance",
    version,
    about = "Terminal-based personal expense tracker",
    long_about = "Records dated, categorized expenses in a plain text file and \
                  reports spending against a monthly budget. Run without a \
                  subcommand to open the interactive menu."
)]
struct Cli {
    /// Directory holding finance_data.txt (defaults to the current directory)
    #[arg(long, global = true, env = "FINANCE_TRACKER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the financial report without opening the menu
    Report {
        /// Also export the category breakdown to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// List recorded expenses
    #[command(alias = "ls")]
    List,

    /// Show the most recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Write the default settings file
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => FinancePaths::with_base_dir(dir),
        None => FinancePaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            let mut shell = Shell::open(&paths, settings, stdin.lock(), stdout.lock())?;
            shell.run()?;
        }
        Some(Commands::Report { csv }) => {
            let outcome = load_ledger(paths.data_file())?;
            report_load(&outcome, &mut io::stdout())?;

            match FinancialReport::generate(&outcome.ledger, &settings.report_categories) {
                Ok(report) => {
                    print!("{}", report.format_terminal(&settings.currency_symbol));
                    if let Some(path) = csv {
                        let file = File::create(&path).with_context(|| {
                            format!("Failed to create {}", path.display())
                        })?;
                        report.export_csv(BufWriter::new(file))?;
                        println!("\nReport exported to {}", path.display());
                    }
                }
                Err(FinanceError::NothingToReport) => {
                    println!("{}", FinanceError::NothingToReport);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Some(Commands::List) => {
            let outcome = load_ledger(paths.data_file())?;
            print!(
                "{}",
                format_expense_list(outcome.ledger.all(), &settings.currency_symbol)
            );
        }
        Some(Commands::Audit { limit }) => {
            let logger = AuditLogger::new(paths.audit_log());
            let total = logger.entry_count()?;
            if total == 0 {
                println!("No audit entries recorded.");
            } else {
                let entries = logger.read_recent(limit)?;
                println!("Showing {} of {} audit entries", entries.len(), total);
                for entry in &entries {
                    println!("{}", entry.format_human_readable());
                }
            }
        }
        Some(Commands::Init) => {
            if paths.settings_file().exists() {
                println!(
                    "Settings already exist at: {}",
                    paths.settings_file().display()
                );
            } else {
                settings.save(&paths)?;
                println!("Settings written to: {}", paths.settings_file().display());
            }
        }
        Some(Commands::Config) => {
            println!("Finance Tracker Configuration");
            println!("=============================");
            println!("Data directory: {}", paths.base_dir().display());
            println!("Data file:      {}", paths.data_file().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!(
                "  Report categories: {}",
                settings.report_categories.join(", ")
            );
            println!("  Audit log enabled: {}", settings.audit_enabled);
        }
    }

    Ok(())
}
