//! Account endpoints: registration, own profile, skills and the coin
//! leaderboard.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use eduhire_core::EduhireError;
use eduhire_users::{LeaderboardEntry, NewUser, SkillEntry, User};
use serde::Deserialize;
use std::sync::Arc;

use super::required_json;
use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;

/// POST /api/users/register
///
/// Request: `{"name", "email", "password", "role"?}`. Returns the new user
/// without its password hash.
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let new_user: NewUser = required_json(&body)?;
    let user = state.users.register(new_user)?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/users/login
///
/// Checks credentials and returns the user. Issuing a session token is left
/// to the fronting proxy; clients send the returned id as `X-User-Id`.
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<User>, ApiError> {
    let req: LoginRequest = required_json(&body)?;
    match state.users.verify_password(&req.email, &req.password)? {
        Some(user) => Ok(Json(user)),
        None => Err(ApiError(EduhireError::Unauthorized(
            "invalid email or password".to_string(),
        ))),
    }
}

/// GET /api/users/profile
pub async fn profile(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

/// GET /api/users/leaderboard: Top users by coins.
pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let limit = state.config.learning.leaderboard_size;
    Ok(Json(state.users.leaderboard(limit)?))
}

/// GET /api/users/skills
pub async fn skills(AuthUser(user): AuthUser) -> Json<Vec<SkillEntry>> {
    Json(user.skills)
}
