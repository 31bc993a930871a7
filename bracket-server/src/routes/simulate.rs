//! Tournament simulation endpoint

use crate::error::ApiError;
use crate::state::ServerState;
use axum::{extract::State, Json};
use bracket_core::simulate::{most_likely_bracket, Ratings};
use bracket_core::team::pick_tokens;
use bracket_core::{simulate, SimulationConfig, SimulationReport, Team, WinModel};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_SIMS: usize = 10_000;
const MAX_SIMS: usize = 100_000;

#[derive(Deserialize)]
pub struct SimulateRequest {
    #[serde(default)]
    pub sims: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub model: WinModel,
    #[serde(default)]
    pub ratings: Ratings,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse {
    #[serde(flatten)]
    pub report: SimulationReport,
    /// Favourite in every game under the model
    #[serde(with = "pick_tokens")]
    pub most_likely: Vec<Option<Team>>,
}

/// Run a Monte Carlo simulation of the tournament
pub async fn run_simulation(
    State(_state): State<Arc<ServerState>>,
    Json(req): Json<SimulateRequest>,
) -> Result<Json<SimulateResponse>, ApiError> {
    let sims = req.sims.unwrap_or(DEFAULT_SIMS);
    if sims > MAX_SIMS {
        return Err(ApiError::bad_request(format!(
            "sims must be at most {}",
            MAX_SIMS
        )));
    }

    let config = SimulationConfig {
        sims,
        seed: req.seed,
        model: req.model,
        ratings: req.ratings,
    };

    tracing::info!("Running {} simulations ({:?} model)", sims, config.model.kind);

    let response = tokio::task::spawn_blocking(move || SimulateResponse {
        report: simulate(&config),
        most_likely: most_likely_bracket(&config.model, &config.ratings).to_flat_picks(),
    })
    .await
    .map_err(|e| ApiError::internal(format!("Simulation task failed: {}", e)))?;

    Ok(Json(response))
}
