//! Registration and login.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::auth;
use crate::config;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::User;
use crate::state::AppState;
use crate::validate;

#[derive(Debug, Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub token: String,
    pub user: UserSummary,
    pub expires_in: i64,
}

/// Minimal user info returned at login; never includes the hash
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
}

/// POST /api/auth/register
pub async fn register(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<User> {
    validate::check(validate::CREDENTIALS, &body)
        .map_err(validate::ValidationFailure::into_bad_request)?;
    let creds: Credentials =
        serde_json::from_value(body).map_err(|e| ApiError::invalid_json(e.to_string()))?;
    let username = creds.username.trim();

    // Duplicate usernames are a conflict outcome, not a server error
    if state.store.find_user_by_username(username).await?.is_some() {
        return Err(ApiError::conflict("User already exists with this user name"));
    }

    let password_hash = auth::hash_password(&creds.password)?;
    let user = state.store.create_user(username, &password_hash).await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(ApiResponse::success(user))
}

/// POST /api/auth/login
pub async fn login(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<LoginData> {
    validate::check(validate::CREDENTIALS, &body)
        .map_err(validate::ValidationFailure::into_bad_request)?;
    let creds: Credentials =
        serde_json::from_value(body).map_err(|e| ApiError::invalid_json(e.to_string()))?;

    let user = state
        .store
        .find_user_by_username(creds.username.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Incorrect username"))?;

    if !auth::verify_password(&creds.password, &user.password_hash)? {
        return Err(ApiError::unauthorized("Incorrect password"));
    }

    let token = auth::issue_token(user.id)?;

    Ok(ApiResponse::success(LoginData {
        token,
        user: UserSummary { id: user.id, username: user.username },
        expires_in: config::config().security.token_ttl_secs,
    }))
}
