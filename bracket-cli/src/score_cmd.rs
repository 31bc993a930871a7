//! Score command - mark a bracket file against a results file
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_inputs(), build_report(), print_report()
//! - Level 3: (delegated to bracket-core scoring)
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use bracket_core::scoring::{max_possible_score, review, GameReview, PickStatus};
use bracket_core::topology::round_title;
use bracket_core::{score, Bracket, GameResult, Score, Team, NUM_ROUNDS, TOTAL_GAMES};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ScoreArgs {
    /// Bracket JSON: a stored bracket, `{ "picks": [...] }`, or a bare array
    #[arg(long, value_name = "FILE")]
    pub bracket: PathBuf,

    /// Results JSON: array of `{ round, indexInRound, winner }` (`globalIndex` optional)
    #[arg(long, value_name = "FILE")]
    pub results: PathBuf,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreReport {
    #[serde(flatten)]
    score: Score,
    max_possible: u32,
    games: Vec<GameReview>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run score command
///
/// 1. Load bracket and results
/// 2. Score and review
/// 3. Print
pub fn run(args: ScoreArgs) -> Result<()> {
    let (bracket, results) = load_inputs(&args.bracket, &args.results)?;

    tracing::info!(
        "Scoring {} against {} results",
        args.bracket.display(),
        results.len()
    );

    let report = build_report(&bracket.picks, &results)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_inputs(bracket: &Path, results: &Path) -> Result<(Bracket, Vec<GameResult>)> {
    let bracket = Bracket::load(bracket)
        .with_context(|| format!("Failed to load bracket from {}", bracket.display()))?;
    let results = GameResult::load_all(results)
        .with_context(|| format!("Failed to load results from {}", results.display()))?;
    Ok((bracket, results))
}

fn build_report(picks: &[Option<Team>], results: &[GameResult]) -> Result<ScoreReport> {
    if picks.len() != TOTAL_GAMES {
        anyhow::bail!("Bracket has {} picks, expected {}", picks.len(), TOTAL_GAMES);
    }

    Ok(ScoreReport {
        score: score(picks, results),
        max_possible: max_possible_score(picks, results),
        games: review(picks, results),
    })
}

fn print_report(report: &ScoreReport) {
    println!("\n=== Bracket Score ===");
    for round in 1..=NUM_ROUNDS as u8 {
        let slot = round as usize - 1;
        let (correct, decided) = tally(&report.games, round);
        println!(
            "  {:<11} {:>3} pts  ({}/{} correct)",
            round_title(round),
            report.score.per_round[slot],
            correct,
            decided
        );
    }
    println!("Total:        {}", report.score.total);
    println!("Max possible: {}", report.max_possible);
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// (correct, decided) picks in a round
fn tally(games: &[GameReview], round: u8) -> (usize, usize) {
    games
        .iter()
        .filter(|g| g.round == round)
        .fold((0, 0), |(correct, decided), g| match g.status {
            PickStatus::Correct => (correct + 1, decided + 1),
            PickStatus::Incorrect | PickStatus::Missing => (correct, decided + 1),
            PickStatus::Pending => (correct, decided),
        })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_report_rejects_short_bracket() {
        assert!(build_report(&[None; 10], &[]).is_err());
    }

    #[test]
    fn test_build_report_and_tally() {
        let mut picks = vec![None; TOTAL_GAMES];
        picks[0] = Some("E1".parse().unwrap());
        picks[1] = Some("E9".parse().unwrap());
        let results = vec![
            GameResult::new(1, 0, "E1".parse().unwrap()).unwrap(),
            GameResult::new(1, 1, "E8".parse().unwrap()).unwrap(),
            GameResult::new(1, 2, "E5".parse().unwrap()).unwrap(),
        ];

        let report = build_report(&picks, &results).unwrap();
        assert_eq!(report.score.total, 1);
        assert_eq!(tally(&report.games, 1), (1, 3));
        assert_eq!(tally(&report.games, 2), (0, 0));
    }
}
