//! Random command - fill a complete bracket at random
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: generate_bracket(), write_bracket(), print_bracket()
//! - Level 3: (delegated to bracket-core selection)
//! - Level 4: file I/O, formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use bracket_core::team::pick_tokens;
use bracket_core::topology::{game_count, round_title};
use bracket_core::{SelectionSet, Team, NUM_ROUNDS};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct RandomArgs {
    /// Write the picks to this JSON file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the picks as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Picks file written by this command, readable by `score`
#[derive(Serialize)]
struct PicksFile {
    #[serde(with = "pick_tokens")]
    picks: Vec<Option<Team>>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run random command
///
/// 1. Fill a bracket
/// 2. Save it if asked
/// 3. Print it
pub fn run(args: RandomArgs, seed: Option<u64>) -> Result<()> {
    let selection = generate_bracket(seed);
    let file = PicksFile {
        picks: selection.to_flat_picks(),
    };

    if let Some(path) = &args.output {
        write_bracket(&file, path)?;
        tracing::info!("Bracket written to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&file)?);
    } else {
        print_bracket(&selection);
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn generate_bracket(seed: Option<u64>) -> SelectionSet {
    let mut rng = create_rng(seed);
    let mut selection = SelectionSet::new();
    selection.random_fill(&mut rng);
    selection
}

fn write_bracket(file: &PicksFile, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(file)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write bracket to {}", path.display()))
}

/// Print the later rounds; round 1 and 2 are long and mostly noise
fn print_bracket(selection: &SelectionSet) {
    for round in 3..=NUM_ROUNDS as u8 {
        println!("{:<11} {}", round_title(round), format_round(selection, round));
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn format_round(selection: &SelectionSet, round: u8) -> String {
    (0..game_count(round))
        .map(|index| {
            selection
                .get(round, index)
                .map_or_else(|| "-".to_string(), |team| team.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
