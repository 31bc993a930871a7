//! Bracket topology endpoints
//!
//! Lets the front end ask which teams may be picked for a game, apply a pick
//! with downstream clearing, and fill a bracket at random, all against a
//! flat 63-slot pick list it holds itself.

use crate::error::ApiError;
use crate::state::ServerState;
use axum::{extract::State, Json};
use bracket_core::team::{parse_pick, parse_picks, pick_tokens, round_one_games, Region};
use bracket_core::topology::{round_title, validate_game};
use bracket_core::{SelectionSet, Team, NUM_ROUNDS, ROUND_GAME_COUNTS, ROUND_WEIGHTS, TOTAL_GAMES};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundInfo {
    pub round: u8,
    pub title: &'static str,
    pub games: usize,
    pub weight: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyResponse {
    pub total_games: usize,
    pub regions: Vec<char>,
    pub rounds: Vec<RoundInfo>,
    pub round1: Vec<[Team; 2]>,
}

/// Static bracket layout
pub async fn get_topology(State(_state): State<Arc<ServerState>>) -> Json<TopologyResponse> {
    let rounds = (1..=NUM_ROUNDS as u8)
        .map(|round| RoundInfo {
            round,
            title: round_title(round),
            games: ROUND_GAME_COUNTS[round as usize - 1],
            weight: ROUND_WEIGHTS[round as usize - 1],
        })
        .collect();

    Json(TopologyResponse {
        total_games: TOTAL_GAMES,
        regions: Region::ALL.iter().map(|r| r.code()).collect(),
        rounds,
        round1: round_one_games(),
    })
}

/// Parse a client pick list; a missing list is an empty bracket
fn selection_from(tokens: Option<Vec<Option<String>>>) -> Result<SelectionSet, ApiError> {
    match tokens {
        None => Ok(SelectionSet::new()),
        Some(tokens) => Ok(SelectionSet::from_flat_picks(&parse_picks(&tokens)?)?),
    }
}

fn game_from(round: Option<i64>, index_in_round: Option<i64>) -> Result<(u8, usize), ApiError> {
    let (Some(round), Some(index)) = (round, index_in_round) else {
        return Err(ApiError::bad_request("round and indexInRound required"));
    };
    Ok(validate_game(round, index)?)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsRequest {
    pub picks: Option<Vec<Option<String>>>,
    pub round: Option<i64>,
    pub index_in_round: Option<i64>,
}

#[derive(Serialize)]
pub struct OptionsResponse {
    pub options: Vec<Team>,
    pub current: Option<Team>,
}

/// Eligible options for one game
pub async fn get_options(
    State(_state): State<Arc<ServerState>>,
    Json(req): Json<OptionsRequest>,
) -> Result<Json<OptionsResponse>, ApiError> {
    let (round, index) = game_from(req.round, req.index_in_round)?;
    let selection = selection_from(req.picks)?;

    Ok(Json(OptionsResponse {
        options: selection.options(round, index),
        current: selection.get(round, index),
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickRequest {
    pub picks: Option<Vec<Option<String>>>,
    pub round: Option<i64>,
    pub index_in_round: Option<i64>,
    pub team: Option<String>,
}

#[derive(Serialize)]
pub struct PickResponse {
    #[serde(with = "pick_tokens")]
    pub picks: Vec<Option<Team>>,
    pub changed: bool,
    pub cleared: Vec<usize>,
}

/// Apply one pick, clearing later rounds if it changed
pub async fn apply_pick(
    State(_state): State<Arc<ServerState>>,
    Json(req): Json<PickRequest>,
) -> Result<Json<PickResponse>, ApiError> {
    let (round, index) = game_from(req.round, req.index_in_round)?;
    let mut selection = selection_from(req.picks)?;
    let team = parse_pick(req.team.as_deref())?;

    let change = selection.set_pick(round, index, team)?;

    Ok(Json(PickResponse {
        picks: selection.to_flat_picks(),
        changed: change.changed,
        cleared: change.cleared,
    }))
}

#[derive(Deserialize)]
pub struct RandomRequest {
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Serialize)]
pub struct RandomResponse {
    #[serde(with = "pick_tokens")]
    pub picks: Vec<Option<Team>>,
    pub champion: Option<Team>,
}

/// A complete bracket with every game picked uniformly at random
pub async fn random_bracket(
    State(_state): State<Arc<ServerState>>,
    Json(req): Json<RandomRequest>,
) -> Json<RandomResponse> {
    let mut rng = match req.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut selection = SelectionSet::new();
    selection.random_fill(&mut rng);

    Json(RandomResponse {
        picks: selection.to_flat_picks(),
        champion: selection.champion(),
    })
}
