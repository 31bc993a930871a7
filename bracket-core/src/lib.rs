//! Bracket Core - Tournament topology, picks and scoring
//!
//! This crate provides the core logic for a 64-team bracket pool:
//! - Team tokens and the fixed round-1 seeding
//! - Bracket topology (flat game indices, feeder games, eligible options)
//! - Selection sets with downstream invalidation
//! - Weighted scoring and leaderboard ranking
//! - In-memory user, bracket and results stores
//! - Monte Carlo tournament simulation

pub mod error;
pub mod team;
pub mod topology;
pub mod selection;
pub mod model;
pub mod scoring;
pub mod store;
pub mod simulate;

// Re-exports for convenient access
pub use error::{BracketError, Result};
pub use team::{Region, Team, SEED_PAIRINGS};
pub use topology::{
    eligible_options, feeder_indices, global_index, locate, start_offset, NUM_ROUNDS,
    ROUND_GAME_COUNTS, ROUND_WEIGHTS, TOTAL_GAMES,
};
pub use selection::{PickChange, SelectionSet};
pub use model::{Bracket, GameResult, User};
pub use scoring::{rank_brackets, score, GameReview, LeaderboardRow, Score};
pub use store::{BracketStore, Pool, ResultsStore, UserRegistry};
pub use simulate::{simulate, SimulationConfig, SimulationReport, WinModel};
