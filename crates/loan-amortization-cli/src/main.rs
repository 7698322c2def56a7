mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::emi::EmiArgs;
use commands::loan::ScheduleArgs;
use commands::mortgage::MortgageArgs;

/// Fixed-rate loan amortization
#[derive(Parser)]
#[command(
    name = "amort",
    version,
    about = "Fixed-rate loan amortization schedules",
    long_about = "A CLI for fixed-rate loan amortization with decimal precision. \
                  Derives the constant periodic payment, the period-by-period \
                  interest/principal split and lifetime totals for raw loans, \
                  EMI quotes and residential mortgages."
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
    /// Amortize a loan from a periodic rate and payment count
    Schedule(ScheduleArgs),
    /// Equated monthly instalment from an annual percentage rate
    Emi(EmiArgs),
    /// Mortgage payment including tax, insurance and HOA dues
    Mortgage(MortgageArgs),
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

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Emi(args) => commands::emi::run_emi(args),
        Commands::Mortgage(args) => commands::mortgage::run_mortgage(args),
        Commands::Version => {
            println!("amort {}", env!("CARGO_PKG_VERSION"));
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
