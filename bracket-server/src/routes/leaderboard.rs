//! Leaderboard endpoint

use crate::state::ServerState;
use axum::{extract::State, Json};
use bracket_core::LeaderboardRow;
use std::sync::Arc;

/// All brackets scored against the current results, best first
pub async fn get_leaderboard(State(state): State<Arc<ServerState>>) -> Json<Vec<LeaderboardRow>> {
    Json(state.read().leaderboard())
}
