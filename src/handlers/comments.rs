//! Comment create/update/delete. Both mutating paths check existence
//! before ownership so a missing comment is a 404 on update and delete
//! alike.

use std::collections::HashMap;

use axum::extract::{Extension, Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::Comment;
use crate::policy;
use crate::state::AppState;
use crate::store::NewComment;
use crate::validate;

use super::parse_id;

#[derive(Debug, Deserialize)]
struct CommentInput {
    message: String,
}

fn parse_input(body: Value) -> Result<CommentInput, ApiError> {
    validate::check(validate::COMMENT_INPUT, &body)
        .map_err(validate::ValidationFailure::into_unprocessable)?;
    serde_json::from_value(body).map_err(|e| ApiError::invalid_json(e.to_string()))
}

/// POST /api/posts/:post_id/comments - comment on an existing post
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(post_id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Comment> {
    let id = parse_id(&post_id, "post")?;
    let input = parse_input(body)?;

    let post = state
        .store
        .find_post(id)
        .await?
        .ok_or_else(|| ApiError::unprocessable_entity("Post not found", HashMap::new()))?;

    let comment = state
        .store
        .create_comment(NewComment { message: input.message, author: user.id })
        .await?;

    // Not transactional with the create above; a failure here orphans the
    // comment, which is accepted
    state.store.append_comment_ref(post.id, comment.id).await?;

    tracing::info!(comment_id = %comment.id, post_id = %post.id, "comment created");
    Ok(ApiResponse::success(comment))
}

/// PUT /api/comments/:comment_id - edit message, owner only
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(comment_id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Comment> {
    let id = parse_id(&comment_id, "comment")?;
    let input = parse_input(body)?;

    let existing = state
        .store
        .find_comment(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    if !policy::authorize(user.id, Some(existing.author)).is_allowed() {
        return Err(ApiError::forbidden("Only authors can edit their comments"));
    }

    let updated = state
        .store
        .update_comment(id, &input.message)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    Ok(ApiResponse::success(updated))
}

/// DELETE /api/comments/:comment_id - owner only
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(comment_id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&comment_id, "comment")?;

    let comment = state
        .store
        .find_comment(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    if !policy::authorize(user.id, Some(comment.author)).is_allowed() {
        return Err(ApiError::forbidden("Only authors can delete their comments"));
    }

    state.store.delete_comment(id).await?;

    tracing::info!(comment_id = %id, "comment deleted");
    Ok(ApiResponse::no_content())
}
