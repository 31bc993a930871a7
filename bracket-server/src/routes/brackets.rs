//! Bracket submission and viewing endpoints

use crate::error::ApiError;
use crate::state::ServerState;
use axum::{
    extract::{Path, State},
    Json,
};
use bracket_core::scoring::{max_possible_score, review, GameReview};
use bracket_core::team::parse_picks;
use bracket_core::{score, Bracket, NUM_ROUNDS};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// List all stored brackets
pub async fn list_brackets(State(state): State<Arc<ServerState>>) -> Json<Vec<Bracket>> {
    Json(state.read().brackets.list().to_vec())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub user_id: Option<String>,
    pub picks: Option<Vec<Option<String>>>,
}

/// Submit or replace a user's bracket
pub async fn submit_bracket(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<Bracket>, ApiError> {
    let user_id = req
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("userId required"))?;
    let tokens = req
        .picks
        .ok_or_else(|| ApiError::bad_request("picks must be array"))?;
    let picks = parse_picks(&tokens)?;

    let bracket = state.write().submit_bracket(&user_id, picks)?;
    tracing::info!("Bracket {} submitted by user {}", bracket.id, bracket.user_id);
    Ok(Json(bracket))
}

/// Get one user's bracket
pub async fn get_bracket(
    State(state): State<Arc<ServerState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Bracket>, ApiError> {
    let pool = state.read();
    let bracket = pool
        .bracket_for(&user_id)?
        .ok_or_else(|| ApiError::not_found(format!("No bracket for user {}", user_id)))?;
    Ok(Json(bracket.clone()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketReview {
    pub bracket_id: String,
    pub user_id: String,
    pub per_round: [u32; NUM_ROUNDS],
    pub total: u32,
    pub max_possible: u32,
    pub games: Vec<GameReview>,
}

/// A stored bracket marked against the official results
pub async fn review_bracket(
    State(state): State<Arc<ServerState>>,
    Path(user_id): Path<String>,
) -> Result<Json<BracketReview>, ApiError> {
    let pool = state.read();
    let bracket = pool
        .bracket_for(&user_id)?
        .ok_or_else(|| ApiError::not_found(format!("No bracket for user {}", user_id)))?;
    let results = pool.results.list();
    let score = score(&bracket.picks, &results);

    Ok(Json(BracketReview {
        bracket_id: bracket.id.clone(),
        user_id: bracket.user_id.clone(),
        per_round: score.per_round,
        total: score.total,
        max_possible: max_possible_score(&bracket.picks, &results),
        games: review(&bracket.picks, &results),
    }))
}
