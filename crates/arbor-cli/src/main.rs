//! Arbor CLI - generate instances, solve them, and play environment episodes.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arbor")]
#[command(author, version, about = "Branch-and-bound environments for packing problems", long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate random problem instances
    Generate(commands::generate::GenerateArgs),
    /// Solve a problem with the default rules
    Solve(commands::solve::SolveArgs),
    /// Solve every problem in a directory
    Batch(commands::batch::BatchArgs),
    /// Play environment episodes on a problem
    Run(commands::run::RunArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Solve(args) => commands::solve::run(args),
        Commands::Batch(args) => commands::batch::run(args),
        Commands::Run(args) => commands::run::run(args),
    }
}
