//! Bracket pool CLI - Command-line interface
//!
//! Commands:
//! - serve: Start the pool server
//! - random: Generate a random complete bracket
//! - score: Score a bracket file against a results file
//! - simulate: Monte Carlo simulation of the tournament

mod random_cmd;
mod score_cmd;
mod server;
mod simulate_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bracket")]
#[command(about = "64-team bracket pool")]
struct Cli {
    /// Random seed for reproducible output
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the pool server
    Serve(server::ServerArgs),
    /// Generate a random complete bracket
    Random(random_cmd::RandomArgs),
    /// Score a bracket against official results
    Score(score_cmd::ScoreArgs),
    /// Simulate the tournament
    Simulate(simulate_cmd::SimulateArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => server::run(args),
        Commands::Random(args) => random_cmd::run(args, cli.seed),
        Commands::Score(args) => score_cmd::run(args),
        Commands::Simulate(args) => simulate_cmd::run(args, cli.seed),
    }
}
