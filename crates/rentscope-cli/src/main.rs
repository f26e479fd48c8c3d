mod commands;
mod input;
mod output;
mod provider;
mod store;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analyze::AnalyzeArgs;
use commands::estimate::{EstimateArgs, SetKeyArgs};
use commands::history::HistoryArgs;
use commands::share::{OpenArgs, ShareArgs};

/// Real-estate investment analysis from the command line
#[derive(Parser)]
#[command(
    name = "reic",
    version,
    about = "Real-estate investment return metrics",
    long_about = "Compute cap rate, NOI, cash flow and cash-on-cash return for a rental \
                  property from its facts and financing assumptions. Facts can be entered \
                  directly, estimated from a street address via the configured estimation \
                  service, shared as compact tokens, and kept in a local history."
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
    /// Compute investment metrics for a property
    Analyze(AnalyzeArgs),
    /// Estimate property facts for an address via the estimation service
    Estimate(EstimateArgs),
    /// Encode property facts and financing as a shareable token
    Share(ShareArgs),
    /// Decode a share token and recompute its metrics
    Open(OpenArgs),
    /// Saved analysis history
    History(HistoryArgs),
    /// Store the estimation service API key locally
    SetKey(SetKeyArgs),
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
        Commands::Analyze(args) => commands::analyze::run_analyze(args),
        Commands::Estimate(args) => commands::estimate::run_estimate(args),
        Commands::Share(args) => commands::share::run_share(args),
        Commands::Open(args) => commands::share::run_open(args),
        Commands::History(args) => commands::history::run_history(args),
        Commands::SetKey(args) => commands::estimate::run_set_key(args),
        Commands::Version => {
            println!("reic {}", env!("CARGO_PKG_VERSION"));
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
