//! User registration endpoints

use crate::error::ApiError;
use crate::state::ServerState;
use axum::{extract::State, Json};
use bracket_core::User;
use serde::Deserialize;
use std::sync::Arc;

/// List registered users
pub async fn list_users(State(state): State<Arc<ServerState>>) -> Json<Vec<User>> {
    Json(state.read().users.list().to_vec())
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
}

/// Get or create a user by name
pub async fn create_user(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let name = req.name.unwrap_or_default();
    let mut pool = state.write();
    let known = pool.users.len();
    let user = pool.users.get_or_create(&name)?;
    if pool.users.len() > known {
        tracing::info!("Registered user {} ({})", user.id, user.name);
    }
    Ok(Json(user))
}
