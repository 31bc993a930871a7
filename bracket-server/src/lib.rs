//! Bracket Server - HTTP API for the bracket pool
//!
//! This crate provides the web backend:
//! - User registration and bracket submission
//! - Official results entry
//! - Leaderboard and per-bracket review
//! - Bracket topology helpers for the front end (options, picks, random fill)
//! - Tournament simulation
//! - Static file serving for the front end

mod error;
mod routes;
mod state;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub use error::ApiError;
pub use state::ServerState;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 4000,
            static_dir: "public".to_string(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `PORT` and `BRACKET_STATIC_DIR`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        if let Ok(dir) = std::env::var("BRACKET_STATIC_DIR") {
            config.static_dir = dir;
        }
        config
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let static_service = ServeDir::new(&config.static_dir);

    Router::new()
        // Health
        .route("/api/health", get(routes::status::health_handler))
        // Users
        .route(
            "/api/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        // Brackets
        .route(
            "/api/brackets",
            get(routes::brackets::list_brackets).post(routes::brackets::submit_bracket),
        )
        .route("/api/brackets/:user_id", get(routes::brackets::get_bracket))
        .route(
            "/api/brackets/:user_id/review",
            get(routes::brackets::review_bracket),
        )
        // Official results
        .route(
            "/api/results",
            get(routes::results::list_results).post(routes::results::record_result),
        )
        .route(
            "/api/results/:global_index",
            delete(routes::results::clear_result),
        )
        // Leaderboard
        .route("/api/leaderboard", get(routes::leaderboard::get_leaderboard))
        // Bracket topology helpers
        .route("/api/topology", get(routes::topology::get_topology))
        .route("/api/bracket/options", post(routes::topology::get_options))
        .route("/api/bracket/pick", post(routes::topology::apply_pick))
        .route("/api/bracket/random", post(routes::topology::random_bracket))
        // Simulation
        .route("/api/simulate", post(routes::simulate::run_simulation))
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive())
        // Static file serving (must be last)
        .fallback_service(static_service)
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(ServerState::new());
    let router = create_router(&config, state);

    tracing::info!("Bracket server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
