//! Simulate command - Monte Carlo tournament simulation
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), print_summary()
//! - Level 3: (delegated to bracket-core simulate)
//! - Level 4: ratings file I/O, formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use bracket_core::simulate::{most_likely_bracket, ModelKind, RatingKind, Ratings};
use bracket_core::{simulate, SimulationConfig, SimulationReport, WinModel};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModelArg {
    Seed,
    Rating,
    Blend,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RatingTypeArg {
    Elo,
    Barthag,
    Adjem,
}

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of simulated tournaments
    #[arg(long, default_value = "10000")]
    pub sims: usize,

    /// Win-probability model
    #[arg(long, value_enum, default_value = "seed")]
    pub model: ModelArg,

    /// How ratings are interpreted (rating and blend models)
    #[arg(long, value_enum, default_value = "elo")]
    pub rating_type: RatingTypeArg,

    /// Rating scale (Elo points per 10x odds, or AdjEM logistic scale)
    #[arg(long)]
    pub scale: Option<f64>,

    /// Rating weight in the blend model (0.0-1.0)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Ratings JSON: `{ "E1": 2100, ... }`
    #[arg(long, value_name = "FILE")]
    pub ratings: Option<PathBuf>,

    /// How many teams to list in the summary
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
///
/// 1. Build the model and load ratings
/// 2. Simulate
/// 3. Print
pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args, seed)?;

    tracing::info!(
        "Simulating {} tournaments ({:?} model, {} rated teams)",
        config.sims,
        config.model.kind,
        config.ratings.len()
    );

    let report = simulate(&config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, &config, args.top);
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_config(args: &SimulateArgs, seed: Option<u64>) -> Result<SimulationConfig> {
    if let Some(alpha) = args.alpha {
        if !(0.0..=1.0).contains(&alpha) {
            anyhow::bail!("alpha must be in 0.0..=1.0, got {}", alpha);
        }
    }

    let ratings = match &args.ratings {
        Some(path) => load_ratings(path)?,
        None => Ratings::default(),
    };

    if !matches!(args.model, ModelArg::Seed) && ratings.is_empty() {
        tracing::warn!("No ratings given; every game falls back to the seed model");
    }

    Ok(SimulationConfig {
        sims: args.sims,
        seed,
        model: build_model(args),
        ratings,
    })
}

fn print_summary(report: &SimulationReport, config: &SimulationConfig, top: usize) {
    println!("\n=== Simulation Complete ===");
    println!("Simulations: {}", report.sims);

    let mut contenders: Vec<_> = report.advancement.iter().collect();
    contenders.sort_by(|a, b| {
        b.1.champ
            .total_cmp(&a.1.champ)
            .then_with(|| b.1.ff.total_cmp(&a.1.ff))
            .then_with(|| a.0.cmp(b.0))
    });

    println!("\n{:<5} {:>7} {:>7} {:>7} {:>7} {:>7}", "Team", "R32", "S16", "E8", "FF", "Champ");
    for (team, adv) in contenders.into_iter().take(top) {
        println!(
            "{:<5} {:>7} {:>7} {:>7} {:>7} {:>7}",
            team,
            percent(adv.r32),
            percent(adv.s16),
            percent(adv.e8),
            percent(adv.ff),
            percent(adv.champ)
        );
    }

    let favourite = most_likely_bracket(&config.model, &config.ratings);
    if let Some(champion) = favourite.champion() {
        println!("\nChalk champion under this model: {}", champion);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn build_model(args: &SimulateArgs) -> WinModel {
    let rating_type = match args.rating_type {
        RatingTypeArg::Elo => RatingKind::Elo,
        RatingTypeArg::Barthag => RatingKind::Barthag,
        RatingTypeArg::Adjem => RatingKind::AdjEm,
    };
    let kind = match args.model {
        ModelArg::Seed => ModelKind::Seed,
        ModelArg::Rating => ModelKind::Rating,
        ModelArg::Blend => ModelKind::Blend,
    };

    WinModel {
        kind,
        rating_type,
        scale: args.scale,
        alpha: args.alpha,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn load_ratings(path: &Path) -> Result<Ratings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read ratings from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid ratings file {}", path.display()))
}

fn percent(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

// ============================================================================
// TESTS
// ============================================================================
