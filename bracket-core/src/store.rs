//! In-memory stores for users, brackets and official results
//!
//! Each mutation either completes or fails validation before touching any
//! store. Callers that share a [`Pool`] across threads serialize writes
//! themselves (the server holds it behind a lock).

use chrono::Utc;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

use crate::error::{BracketError, Result};
use crate::model::{Bracket, GameResult, User};
use crate::scoring::{rank_brackets, LeaderboardRow};
use crate::team::Team;
use crate::topology::TOTAL_GAMES;

/// Users keyed by id, deduplicated by name
#[derive(Clone, Debug, Default)]
pub struct UserRegistry {
    users: Vec<User>,
    by_name: FxHashMap<String, usize>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the user with this name, registering it if new
    pub fn get_or_create(&mut self, name: &str) -> Result<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BracketError::EmptyName);
        }
        if let Some(&idx) = self.by_name.get(name) {
            return Ok(self.users[idx].clone());
        }
        let user = User {
            id: (self.users.len() + 1).to_string(),
            name: name.to_string(),
        };
        self.by_name.insert(user.name.clone(), self.users.len());
        self.users.push(user.clone());
        Ok(user)
    }

    pub fn get(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn list(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// At most one bracket per user; later submissions overwrite
#[derive(Clone, Debug, Default)]
pub struct BracketStore {
    brackets: Vec<Bracket>,
    by_user: FxHashMap<String, usize>,
}

impl BracketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: &str) -> Option<&Bracket> {
        self.by_user.get(user_id).map(|&idx| &self.brackets[idx])
    }

    /// Upsert a user's bracket, refreshing its submission time
    pub fn put(&mut self, user_id: &str, picks: Vec<Option<Team>>) -> Result<Bracket> {
        if picks.len() != TOTAL_GAMES {
            return Err(BracketError::MalformedBracket {
                expected: TOTAL_GAMES,
                actual: picks.len(),
            });
        }
        let submitted_at = Utc::now();

        if let Some(&idx) = self.by_user.get(user_id) {
            let bracket = &mut self.brackets[idx];
            bracket.picks = picks;
            bracket.submitted_at = submitted_at;
            return Ok(bracket.clone());
        }

        let bracket = Bracket {
            id: (self.brackets.len() + 1).to_string(),
            user_id: user_id.to_string(),
            picks,
            submitted_at,
        };
        self.by_user.insert(user_id.to_string(), self.brackets.len());
        self.brackets.push(bracket.clone());
        Ok(bracket)
    }

    /// Brackets in first-submission order
    pub fn list(&self) -> &[Bracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }
}

/// At most one official result per game; later submissions overwrite
#[derive(Clone, Debug, Default)]
pub struct ResultsStore {
    results: BTreeMap<usize, GameResult>,
}

impl ResultsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, global_index: usize) -> Option<&GameResult> {
        self.results.get(&global_index)
    }

    /// Upsert the winner of a game
    pub fn put(&mut self, round: u8, index_in_round: usize, winner: Team) -> Result<GameResult> {
        let result = GameResult::new(round, index_in_round, winner)?;
        self.results.insert(result.global_index, result.clone());
        Ok(result)
    }

    /// Retract a recorded result
    pub fn clear(&mut self, global_index: usize) -> Option<GameResult> {
        self.results.remove(&global_index)
    }

    /// Results ordered by global index
    pub fn list(&self) -> Vec<GameResult> {
        self.results.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Users, brackets and results for one pool
#[derive(Clone, Debug, Default)]
pub struct Pool {
    pub users: UserRegistry,
    pub brackets: BracketStore,
    pub results: ResultsStore,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a user's bracket
    ///
    /// Resubmitting after results are in is allowed.
    pub fn submit_bracket(&mut self, user_id: &str, picks: Vec<Option<Team>>) -> Result<Bracket> {
        if !self.users.contains(user_id) {
            return Err(BracketError::UnknownUser(user_id.to_string()));
        }
        self.brackets.put(user_id, picks)
    }

    /// A registered user's bracket, if submitted
    pub fn bracket_for(&self, user_id: &str) -> Result<Option<&Bracket>> {
        if !self.users.contains(user_id) {
            return Err(BracketError::UnknownUser(user_id.to_string()));
        }
        Ok(self.brackets.get(user_id))
    }

    /// Record the official winner of a game
    pub fn record_result(
        &mut self,
        round: u8,
        index_in_round: usize,
        winner: Team,
    ) -> Result<GameResult> {
        self.results.put(round, index_in_round, winner)
    }

    /// Every stored bracket, scored and ranked
    pub fn leaderboard(&self) -> Vec<LeaderboardRow> {
        rank_brackets(
            self.brackets.list(),
            &self.results.list(),
            self.users.list(),
        )
    }
}
