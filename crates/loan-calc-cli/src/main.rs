mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::currency::{ConvertArgs, CurrenciesArgs};
use commands::loan::LoanArgs;

/// Loan repayment schedules with multi-currency display
#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Loan repayment schedules with multi-currency display",
    long_about = "Computes the fixed monthly installment (EMI), total interest and the \
                  period-by-period amortization schedule of a loan with decimal \
                  precision, and shows the figures in any currency of a rate table."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Installment, total payment and total interest of a loan
    Loan(LoanArgs),
    /// Period-by-period amortization schedule
    Schedule(LoanArgs),
    /// Convert an amount from the base currency
    Convert(ConvertArgs),
    /// List currencies in the rate table
    Currencies(CurrenciesArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

/// Diagnostics go to stderr so stdout stays machine-readable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Loan(args) => commands::loan::run_loan(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Convert(args) => commands::currency::run_convert(args),
        Commands::Currencies(args) => commands::currency::run_currencies(args),
        Commands::Version => {
            println!("loancalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    let outcome = result.and_then(|value| output::format_output(&cli.output, &value));
    if let Err(e) = outcome {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(1);
    }
}
