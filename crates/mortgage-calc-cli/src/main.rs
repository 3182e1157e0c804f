mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::Value;
use std::process;
use tracing_subscriber::EnvFilter;

use mortgage_calc_core::MortgageError;

use commands::repayment::{CalculateArgs, ValidateArgs};

/// Mortgage repayment calculations
#[derive(Parser)]
#[command(
    name = "mortgage",
    version,
    about = "Mortgage repayment calculator",
    long_about = "Validates a mortgage form (amount, term, interest rate, repayment type) \
                  and computes the monthly and total repayments with decimal precision. \
                  Supports repayment (amortising) and interest-only mortgages."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log debug events to stderr (overridden by MORTGAGE_LOG / RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a mortgage form and calculate monthly and total repayments
    Calculate(CalculateArgs),
    /// Validate a mortgage form without calculating
    Validate(ValidateArgs),
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

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::repayment::run_calculate(args),
        Commands::Validate(args) => commands::repayment::run_validate(args),
        Commands::Version => {
            println!("mortgage {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            let rejected = value.get("valid") == Some(&Value::Bool(false));
            process::exit(if rejected { 1 } else { 0 });
        }
        Err(e) => {
            report_error(&*e);
            process::exit(1);
        }
    }
}

/// Logs go to stderr so machine-readable output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("MORTGAGE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report_error(e: &(dyn std::error::Error + 'static)) {
    if let Some(MortgageError::Validation(errors)) = e.downcast_ref::<MortgageError>() {
        eprintln!("{}: the mortgage form has errors", "error".red().bold());
        for (field, error) in errors.iter() {
            eprintln!("  {} {}", format!("{field}:").yellow(), error);
        }
        return;
    }
    eprintln!("{}: {}", "error".red().bold(), e);
}
