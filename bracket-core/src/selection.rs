//! Selection sets: per-round picks with downstream invalidation
//!
//! A selection set backs every bracket-shaped view: a user's in-progress
//! submission, a stored bracket being viewed, and official results entry.
//! Each is an independent value; nothing here is shared.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{BracketError, Result};
use crate::model::GameResult;
use crate::team::Team;
use crate::topology::{
    check_game, eligible_options, game_count, global_index, start_offset, NUM_ROUNDS,
    ROUND_GAME_COUNTS, TOTAL_GAMES,
};

/// Six rounds of optional picks
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionSet {
    rounds: [Vec<Option<Team>>; NUM_ROUNDS],
}

/// Outcome of a successful [`SelectionSet::set_pick`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PickChange {
    /// Value held before the call
    pub previous: Option<Team>,
    /// Whether the stored value changed
    pub changed: bool,
    /// Global indices of later-round picks that were cleared
    pub cleared: Vec<usize>,
}

impl SelectionSet {
    /// Empty selection set sized to the bracket
    pub fn new() -> Self {
        Self {
            rounds: ROUND_GAME_COUNTS.map(|count| vec![None; count]),
        }
    }

    /// Pick stored for a game, if any
    pub fn get(&self, round: u8, index_in_round: usize) -> Option<Team> {
        self.round(round).get(index_in_round).copied().flatten()
    }

    /// All picks of one round; empty slice for rounds outside 1..=6
    pub fn round(&self, round: u8) -> &[Option<Team>] {
        match round {
            1..=6 => self.rounds[round as usize - 1].as_slice(),
            _ => &[],
        }
    }

    /// Teams currently pickable for a game
    pub fn options(&self, round: u8, index_in_round: usize) -> Vec<Team> {
        eligible_options(self, round, index_in_round)
    }

    /// Store a pick, clearing later rounds when the value changes
    ///
    /// `None` clears the slot. A non-empty value must be among the game's
    /// eligible options, otherwise the set is left untouched.
    pub fn set_pick(
        &mut self,
        round: u8,
        index_in_round: usize,
        value: Option<Team>,
    ) -> Result<PickChange> {
        check_game(round, index_in_round)?;

        if let Some(team) = value {
            let options = self.options(round, index_in_round);
            if !options.contains(&team) {
                return Err(BracketError::InvalidPick {
                    round,
                    index: index_in_round,
                    value: team.to_string(),
                    options: format_options(&options),
                });
            }
        }

        let slot = &mut self.rounds[round as usize - 1][index_in_round];
        let previous = *slot;
        if previous == value {
            return Ok(PickChange {
                previous,
                changed: false,
                cleared: Vec::new(),
            });
        }
        *slot = value;

        Ok(PickChange {
            previous,
            changed: true,
            cleared: self.clear_after(round),
        })
    }

    /// Clear every pick in rounds after `round`, returning the cleared indices
    fn clear_after(&mut self, round: u8) -> Vec<usize> {
        let mut cleared = Vec::new();
        for later in (round + 1)..=NUM_ROUNDS as u8 {
            for (index, pick) in self.rounds[later as usize - 1].iter_mut().enumerate() {
                if pick.take().is_some() {
                    cleared.push(global_index(later, index));
                }
            }
        }
        cleared
    }

    /// Concatenate rounds 1..=6 into a 63-entry flat array
    pub fn to_flat_picks(&self) -> Vec<Option<Team>> {
        self.rounds.iter().flatten().copied().collect()
    }

    /// Slice a 63-entry flat array back into rounds
    ///
    /// Picks are taken as given; use [`SelectionSet::prune_ineligible`] to
    /// drop ones that no longer follow from their feeders.
    pub fn from_flat_picks(flat: &[Option<Team>]) -> Result<Self> {
        if flat.len() != TOTAL_GAMES {
            return Err(BracketError::MalformedBracket {
                expected: TOTAL_GAMES,
                actual: flat.len(),
            });
        }
        let mut selection = Self::new();
        for (slot, round) in selection.rounds.iter_mut().enumerate() {
            let start = start_offset(slot as u8 + 1);
            let len = round.len();
            round.copy_from_slice(&flat[start..start + len]);
        }
        Ok(selection)
    }

    /// Official-results view: each recorded winner at its game
    pub fn from_results(results: &[GameResult]) -> Self {
        let mut selection = Self::new();
        for result in results {
            if check_game(result.round, result.index_in_round).is_ok() {
                selection.rounds[result.round as usize - 1][result.index_in_round] =
                    Some(result.winner);
            }
        }
        selection
    }

    /// Fill every game with a uniformly random eligible team
    ///
    /// Rounds are filled in order so each round sees the freshly assigned
    /// winners of the previous one. Games without options are left empty.
    pub fn random_fill<R: Rng>(&mut self, rng: &mut R) {
        for round in 1..=NUM_ROUNDS as u8 {
            for index in 0..game_count(round) {
                let pick = self.options(round, index).choose(rng).copied();
                self.assign(round, index, pick);
            }
        }
    }

    /// Overwrite a slot without eligibility checks or downstream clearing
    ///
    /// For callers that fill rounds in order from freshly computed options.
    pub(crate) fn assign(&mut self, round: u8, index_in_round: usize, value: Option<Team>) {
        self.rounds[round as usize - 1][index_in_round] = value;
    }

    /// Clear picks that are not eligible given their feeders
    ///
    /// Walks rounds in order, so a cleared pick also invalidates picks that
    /// depended on it. Returns the cleared global indices.
    pub fn prune_ineligible(&mut self) -> Vec<usize> {
        let mut cleared = Vec::new();
        for round in 1..=NUM_ROUNDS as u8 {
            for index in 0..game_count(round) {
                let Some(team) = self.get(round, index) else {
                    continue;
                };
                if !self.options(round, index).contains(&team) {
                    self.rounds[round as usize - 1][index] = None;
                    cleared.push(global_index(round, index));
                }
            }
        }
        cleared
    }

    /// Number of games with a pick
    pub fn filled_count(&self) -> usize {
        self.rounds.iter().flatten().filter(|p| p.is_some()).count()
    }

    /// Whether every game has a pick
    pub fn is_complete(&self) -> bool {
        self.filled_count() == TOTAL_GAMES
    }

    /// Pick for the final, if made
    pub fn champion(&self) -> Option<Team> {
        self.get(NUM_ROUNDS as u8, 0)
    }
}

impl Default for SelectionSet {
    fn default() -> Self {
        Self::new()
    }
}

fn format_options(options: &[Team]) -> String {
    if options.is_empty() {
        return "none".to_string();
    }
    options
        .iter()
        .map(Team::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
