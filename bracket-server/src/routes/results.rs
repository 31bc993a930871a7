//! Official results endpoints

use crate::error::ApiError;
use crate::state::ServerState;
use axum::{
    extract::{Path, State},
    Json,
};
use bracket_core::team::parse_pick;
use bracket_core::topology::validate_game;
use bracket_core::GameResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// List recorded results in game order
pub async fn list_results(State(state): State<Arc<ServerState>>) -> Json<Vec<GameResult>> {
    Json(state.read().results.list())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    pub round: Option<i64>,
    pub index_in_round: Option<i64>,
    pub winner: Option<String>,
}

/// Record or overwrite the winner of a game
pub async fn record_result(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<RecordRequest>,
) -> Result<Json<GameResult>, ApiError> {
    let (Some(round), Some(index), Some(winner)) = (req.round, req.index_in_round, req.winner)
    else {
        return Err(ApiError::bad_request("round, indexInRound, winner required"));
    };
    let (round, index) = validate_game(round, index)?;
    let winner = parse_pick(Some(winner.as_str()))?
        .ok_or_else(|| ApiError::bad_request("round, indexInRound, winner required"))?;

    let result = state.write().record_result(round, index, winner)?;
    tracing::info!(
        "Result recorded: round {} game {} won by {}",
        result.round,
        result.index_in_round,
        result.winner
    );
    Ok(Json(result))
}

#[derive(Serialize)]
pub struct ClearResponse {
    pub cleared: bool,
}

/// Retract the result of a game
pub async fn clear_result(
    State(state): State<Arc<ServerState>>,
    Path(global_index): Path<usize>,
) -> Json<ClearResponse> {
    let cleared = state.write().results.clear(global_index).is_some();
    if cleared {
        tracing::info!("Result cleared for game {}", global_index);
    }
    Json(ClearResponse { cleared })
}
