//! Profile read and bio/avatar updates. These routes require an
//! authenticated caller but carry no ownership restriction.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Post, User};
use crate::state::AppState;
use crate::validate;

use super::parse_id;

#[derive(Debug, Serialize)]
pub struct ProfileData {
    pub user: User,
    pub posts: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct BioInput {
    bio: String,
}

#[derive(Debug, Deserialize)]
struct AvatarInput {
    avatar: String,
}

/// GET /api/profile/:user_id - user plus everything they have posted
pub async fn get(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<ProfileData> {
    let id = parse_id(&user_id, "user")?;

    let user = state
        .store
        .find_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("No user found"))?;

    let posts = state.store.posts_by_author(id).await?;

    Ok(ApiResponse::success(ProfileData { user, posts }))
}

/// PUT /api/profile/:user_id/bio
pub async fn update_bio(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<User> {
    let id = parse_id(&user_id, "user")?;
    validate::check(validate::BIO_INPUT, &body)
        .map_err(validate::ValidationFailure::into_unprocessable)?;
    let input: BioInput =
        serde_json::from_value(body).map_err(|e| ApiError::invalid_json(e.to_string()))?;

    let updated = state
        .store
        .set_bio(id, input.bio.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("No user found"))?;

    Ok(ApiResponse::success(updated))
}

/// PUT /api/profile/:user_id/avatar - re-host the image, persist the
/// canonical URL
pub async fn update_avatar(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<User> {
    let id = parse_id(&user_id, "user")?;
    validate::check(validate::AVATAR_INPUT, &body)
        .map_err(validate::ValidationFailure::into_unprocessable)?;
    let input: AvatarInput =
        serde_json::from_value(body).map_err(|e| ApiError::invalid_json(e.to_string()))?;

    // Check for the user before paying for the upload
    if state.store.find_user(id).await?.is_none() {
        return Err(ApiError::not_found("No user found"));
    }

    let uploaded = state.images.upload(&input.avatar).await?;

    let updated = state
        .store
        .set_avatar(id, &uploaded.secure_url)
        .await?
        .ok_or_else(|| ApiError::not_found("No user found"))?;

    Ok(ApiResponse::success(updated))
}
