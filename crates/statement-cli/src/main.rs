mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::cash_flows::CashFlowsArgs;
use commands::ratios::RatiosArgs;
use commands::statement::StatementArgs;

/// Statutory financial statement analysis
#[derive(Parser)]
#[command(
    name = "fsa",
    version,
    about = "Statutory financial statement normalization and ratio analysis",
    long_about = "A CLI that normalizes statutory income statement, balance sheet and \
                  cash-flow exports, derives horizontal and vertical analysis, and \
                  computes financial ratios benchmarked against industry averages."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log parse decisions and absorbed failures to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize one statement, optionally with growth and share columns
    Statement(StatementArgs),
    /// Operating and free cash flow from the cash-flow statement
    CashFlows(CashFlowsArgs),
    /// Compute financial ratios and compare them with benchmarks
    Ratios(RatiosArgs),
    /// Print the benchmark table
    Benchmarks,
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

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Statement(args) => commands::statement::run_statement(args),
        Commands::CashFlows(args) => commands::cash_flows::run_cash_flows(args),
        Commands::Ratios(args) => commands::ratios::run_ratios(args),
        Commands::Benchmarks => commands::benchmarks::run_benchmarks(),
        Commands::Version => {
            println!("fsa {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
