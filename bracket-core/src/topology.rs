//! Bracket topology: flat game indices, feeder games and eligible options
//!
//! Games are numbered round-major: the 32 round-1 games occupy global
//! indices 0..32, round 2 occupies 32..48, and so on up to the final at 62.
//! Within rounds 1-4 games are region-major (E, W, M, S).

use crate::error::{BracketError, Result};
use crate::selection::SelectionSet;
use crate::team::{seeding_pair, Team};

/// Number of rounds in a 64-team bracket
pub const NUM_ROUNDS: usize = 6;

/// Games played in each round
pub const ROUND_GAME_COUNTS: [usize; NUM_ROUNDS] = [32, 16, 8, 4, 2, 1];

/// Points for a correct pick in each round
pub const ROUND_WEIGHTS: [u32; NUM_ROUNDS] = [1, 2, 4, 8, 16, 32];

/// Total games in the bracket (length of a flat picks array)
pub const TOTAL_GAMES: usize = 63;

/// Rounds played inside a single region (through the Elite 8)
pub const REGIONAL_ROUNDS: u8 = 4;

const REGION_COUNT: usize = 4;

const ROUND_TITLES: [&str; NUM_ROUNDS] = [
    "Round 1",
    "Round 2",
    "Sweet 16",
    "Elite 8",
    "Final Four",
    "Champion",
];

/// Global index of the first game of `round`
///
/// Round 1 starts at 0. `start_offset(7)` is `TOTAL_GAMES`.
pub fn start_offset(round: u8) -> usize {
    let before = (round as usize).saturating_sub(1).min(NUM_ROUNDS);
    ROUND_GAME_COUNTS[..before].iter().sum()
}

/// Flat index of a game
pub fn global_index(round: u8, index_in_round: usize) -> usize {
    start_offset(round) + index_in_round
}

/// Inverse of [`global_index`]
pub fn locate(global_index: usize) -> Option<(u8, usize)> {
    (1..=NUM_ROUNDS as u8).find_map(|round| {
        let start = start_offset(round);
        let local = global_index.checked_sub(start)?;
        (local < game_count(round)).then_some((round, local))
    })
}

/// Games in `round`, zero for rounds outside 1..=6
pub fn game_count(round: u8) -> usize {
    round_slot(round).map_or(0, |r| ROUND_GAME_COUNTS[r])
}

/// Weight of a correct pick in `round`
pub fn round_weight(round: u8) -> Option<u32> {
    round_slot(round).map(|r| ROUND_WEIGHTS[r])
}

/// Display title of a round
pub fn round_title(round: u8) -> &'static str {
    round_slot(round).map_or("", |r| ROUND_TITLES[r])
}

fn round_slot(round: u8) -> Option<usize> {
    (1..=NUM_ROUNDS as u8)
        .contains(&round)
        .then(|| round as usize - 1)
}

/// Check that (round, index_in_round) names a real game
pub fn check_game(round: u8, index_in_round: usize) -> Result<()> {
    if round_slot(round).is_none() {
        return Err(BracketError::OutOfRange(format!(
            "round {} out of range (expected 1..={})",
            round, NUM_ROUNDS
        )));
    }
    let max_index = game_count(round) - 1;
    if index_in_round > max_index {
        return Err(BracketError::OutOfRange(format!(
            "indexInRound must be 0..{} for round {}",
            max_index, round
        )));
    }
    Ok(())
}

/// Validate untrusted wire values and narrow them to a game coordinate
pub fn validate_game(round: i64, index_in_round: i64) -> Result<(u8, usize)> {
    let round = u8::try_from(round).map_err(|_| {
        BracketError::OutOfRange(format!(
            "round {} out of range (expected 1..={})",
            round, NUM_ROUNDS
        ))
    })?;
    let index = usize::try_from(index_in_round).map_err(|_| {
        BracketError::OutOfRange(format!("indexInRound {} out of range", index_in_round))
    })?;
    check_game(round, index)?;
    Ok((round, index))
}

/// Global indices of the two previous-round games feeding this game
///
/// Round 1 has no feeders (options come from seeding).
pub fn feeder_indices(round: u8, global_index: usize) -> Option<(usize, usize)> {
    if round <= 1 || round_slot(round).is_none() {
        return None;
    }
    let local = global_index.checked_sub(start_offset(round))?;
    if local >= game_count(round) {
        return None;
    }
    let prev_round = round - 1;
    let prev_start = start_offset(prev_round);

    if round <= REGIONAL_ROUNDS {
        let prev_per_region = game_count(prev_round) / REGION_COUNT;
        let curr_per_region = game_count(round) / REGION_COUNT;
        let region = local / curr_per_region;
        let idx_in_region = local % curr_per_region;
        let first = prev_start + region * prev_per_region + idx_in_region * 2;
        return Some((first, first + 1));
    }

    match (round, local) {
        (5, 0) => Some((prev_start, prev_start + 1)),
        (5, _) => Some((prev_start + 2, prev_start + 3)),
        _ => Some((prev_start, prev_start + 1)),
    }
}

/// Teams that may currently be picked for a game
///
/// Round 1 yields the seeding pair. Later rounds yield the non-empty
/// winners of the two feeder games, in feeder order.
pub fn eligible_options(selection: &SelectionSet, round: u8, index_in_round: usize) -> Vec<Team> {
    if round == 1 {
        return seeding_pair(index_in_round).map(Vec::from).unwrap_or_default();
    }
    let Some((a, b)) = feeder_indices(round, global_index(round, index_in_round)) else {
        return Vec::new();
    };
    let prev_round = round - 1;
    let prev_start = start_offset(prev_round);
    [a, b]
        .into_iter()
        .filter_map(|feeder| selection.get(prev_round, feeder - prev_start))
        .collect()
}

/// Whether `team` is currently a legal pick for the game
pub fn is_eligible(selection: &SelectionSet, round: u8, index_in_round: usize, team: Team) -> bool {
    eligible_options(selection, round, index_in_round).contains(&team)
}

/// Index within `round` of the game a team must win to reach round + 1
pub fn path_game(team: Team, round: u8) -> usize {
    team.round_one_index() >> round.saturating_sub(1)
}
