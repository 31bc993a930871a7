//! HTTP route handlers

pub mod brackets;
pub mod leaderboard;
pub mod results;
pub mod simulate;
pub mod status;
pub mod topology;
pub mod users;
