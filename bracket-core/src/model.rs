//! Persisted and transmitted record shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::selection::SelectionSet;
use crate::team::{pick_tokens, Team};
use crate::topology::{check_game, global_index, validate_game};

/// A registered pool participant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// One user's submitted bracket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bracket {
    pub id: String,
    pub user_id: String,
    /// 63 picks in global game order
    #[serde(with = "pick_tokens")]
    pub picks: Vec<Option<Team>>,
    pub submitted_at: DateTime<Utc>,
}

impl Bracket {
    /// Picks as a selection set
    pub fn selection(&self) -> Result<SelectionSet> {
        SelectionSet::from_flat_picks(&self.picks)
    }

    /// Load from a JSON file
    ///
    /// Accepts a full bracket record or a bare array of picks.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;

        if let Ok(bracket) = serde_json::from_str::<Bracket>(&content) {
            return Ok(bracket);
        }

        #[derive(Deserialize)]
        struct Picks(#[serde(with = "pick_tokens")] Vec<Option<Team>>);

        #[derive(Deserialize)]
        struct Wrapped {
            #[serde(with = "pick_tokens")]
            picks: Vec<Option<Team>>,
        }

        let picks = match serde_json::from_str::<Wrapped>(&content) {
            Ok(wrapped) => wrapped.picks,
            Err(_) => serde_json::from_str::<Picks>(&content)?.0,
        };

        Ok(Bracket {
            id: String::new(),
            user_id: String::new(),
            picks,
            submitted_at: Utc::now(),
        })
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Official outcome of one game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub round: u8,
    pub index_in_round: usize,
    pub global_index: usize,
    pub winner: Team,
}

impl GameResult {
    pub fn new(round: u8, index_in_round: usize, winner: Team) -> Result<Self> {
        check_game(round, index_in_round)?;
        Ok(Self {
            round,
            index_in_round,
            global_index: global_index(round, index_in_round),
            winner,
        })
    }

    /// Load a results list from a JSON file
    ///
    /// Each entry is `{ round, indexInRound, winner }`. The global index is
    /// derived; an explicit `globalIndex` must agree with it.
    pub fn load_all(path: &Path) -> anyhow::Result<Vec<Self>> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Record {
            round: i64,
            index_in_round: i64,
            global_index: Option<usize>,
            winner: Team,
        }

        let content = std::fs::read_to_string(path)?;
        let records: Vec<Record> = serde_json::from_str(&content)?;

        records
            .into_iter()
            .map(|record| -> anyhow::Result<Self> {
                let (round, index) = validate_game(record.round, record.index_in_round)?;
                let result = GameResult::new(round, index, record.winner)?;
                if let Some(given) = record.global_index {
                    if given != result.global_index {
                        anyhow::bail!(
                            "globalIndex {} does not match round {} game {} (expected {})",
                            given,
                            round,
                            index,
                            result.global_index
                        );
                    }
                }
                Ok(result)
            })
            .collect()
    }
}
