//! Post CRUD. Every mutating path runs the ownership policy before
//! touching the store.

use axum::extract::{Extension, Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{CommentView, Post, PostDetail, PostSummary};
use crate::policy;
use crate::state::AppState;
use crate::store::{NewPost, PostPatch};
use crate::validate;

use super::{author_view, parse_id};

#[derive(Debug, Deserialize)]
struct PostInput {
    title: String,
    body: String,
    tags: Vec<String>,
}

fn parse_input(body: Value) -> Result<PostInput, ApiError> {
    validate::check(validate::POST_INPUT, &body)
        .map_err(validate::ValidationFailure::into_unprocessable)?;
    serde_json::from_value(body).map_err(|e| ApiError::invalid_json(e.to_string()))
}

/// GET /api/posts - all posts, newest first, authors populated
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<PostSummary>> {
    let posts = state.store.find_posts_newest_first().await?;

    let mut summaries = Vec::with_capacity(posts.len());
    for post in posts {
        let author = author_view(&*state.store, post.author).await?;
        summaries.push(PostSummary::new(post, author));
    }

    // An empty board is an empty array, never an error
    Ok(ApiResponse::success(summaries))
}

/// GET /api/posts/:post_id - single post with author and comments populated
pub async fn get(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<PostDetail> {
    let id = parse_id(&post_id, "post")?;
    let post = state
        .store
        .find_post(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    let author = author_view(&*state.store, post.author).await?;

    let mut comments = Vec::with_capacity(post.comment_ids.len());
    for comment_id in post.comment_ids.clone() {
        // References to since-deleted comments are skipped, not errors
        if let Some(comment) = state.store.find_comment(comment_id).await? {
            let comment_author = author_view(&*state.store, comment.author).await?;
            comments.push(CommentView::new(comment, comment_author));
        }
    }

    Ok(ApiResponse::success(PostDetail::new(post, author, comments)))
}

/// POST /api/posts - create a post owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> ApiResult<Post> {
    let input = parse_input(body)?;

    let post = state
        .store
        .create_post(NewPost {
            title: input.title,
            body: input.body,
            tags: input.tags,
            author: user.id,
        })
        .await?;

    tracing::info!(post_id = %post.id, author = %user.id, "post created");
    Ok(ApiResponse::success(post))
}

/// PUT /api/posts/:post_id - replace title/body/tags, owner only
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(post_id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Post> {
    let id = parse_id(&post_id, "post")?;
    let input = parse_input(body)?;

    let existing = state
        .store
        .find_post(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if !policy::authorize(user.id, Some(existing.author)).is_allowed() {
        return Err(ApiError::forbidden("Forbidden. You are not the owner of this post."));
    }

    let updated = state
        .store
        .update_post(id, PostPatch { title: input.title, body: input.body, tags: input.tags })
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(ApiResponse::success(updated))
}

/// DELETE /api/posts/:post_id - owner only; attached comments are left
/// orphaned
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(post_id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&post_id, "post")?;

    let post = state
        .store
        .find_post(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if !policy::authorize(user.id, Some(post.author)).is_allowed() {
        return Err(ApiError::forbidden("Forbidden. You are not the owner of this post."));
    }

    state.store.delete_post(id).await?;

    tracing::info!(post_id = %id, "post deleted");
    Ok(ApiResponse::no_content())
}
