//! Router assembly: route tables, auth gating per method, global layers.

use axum::routing::{get, post, put};
use axum::{middleware::from_fn, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::handlers;
use crate::middleware::require_auth;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(post_routes())
        .merge(comment_routes())
        .merge(profile_routes())
        .fallback(not_found)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
}

fn post_routes() -> Router<AppState> {
    use handlers::posts;

    Router::new()
        .route(
            "/api/posts",
            get(posts::list).merge(post(posts::create).route_layer(from_fn(require_auth))),
        )
        .route(
            "/api/posts/:post_id",
            get(posts::get).merge(
                put(posts::update)
                    .delete(posts::remove)
                    .route_layer(from_fn(require_auth)),
            ),
        )
}

fn comment_routes() -> Router<AppState> {
    use handlers::comments;

    Router::new()
        .route("/api/posts/:post_id/comments", post(comments::create))
        .route(
            "/api/comments/:comment_id",
            put(comments::update).delete(comments::remove),
        )
        .route_layer(from_fn(require_auth))
}

fn profile_routes() -> Router<AppState> {
    use handlers::profile;

    Router::new()
        .route("/api/profile/:user_id", get(profile::get))
        .route("/api/profile/:user_id/bio", put(profile::update_bio))
        .route("/api/profile/:user_id/avatar", put(profile::update_avatar))
        .route_layer(from_fn(require_auth))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Quill API",
            "version": version,
            "description": "Blogging/forum backend API built with Rust (Axum)",
            "endpoints": {
                "register": "POST /api/auth/register (public)",
                "login": "POST /api/auth/login (public)",
                "posts": "GET /api/posts, GET /api/posts/:post_id (public); POST/PUT/DELETE (bearer token)",
                "comments": "POST /api/posts/:post_id/comments, PUT/DELETE /api/comments/:comment_id (bearer token)",
                "profile": "GET /api/profile/:user_id, PUT .../bio, PUT .../avatar (bearer token)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> (axum::http::StatusCode, Json<Value>) {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "store": "ok" }
            })),
        ),
        Err(e) => {
            tracing::error!("store unavailable: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "store unavailable",
                    "data": { "status": "degraded", "timestamp": now }
                })),
            )
        }
    }
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
