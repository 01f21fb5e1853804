#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use quill_api::routes;
use quill_api::services::LocalImageHost;
use quill_api::state::AppState;
use quill_api::store::MemStore;

/// Fresh app over an empty in-memory store
pub fn test_app() -> Router {
    let state = AppState::new(
        Arc::new(MemStore::new()),
        Arc::new(LocalImageHost::new("avatars")),
    );
    routes::app(state)
}

/// Drive one request through the router and return status plus parsed body
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub const TEST_PASSWORD: &str = "password123";

/// Register a user and log in; returns (token, user id)
pub async fn register_and_login(app: &Router, username: &str) -> (String, String) {
    let (status, _) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "username": username, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed for {}", username);

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed for {}", username);

    let token = body["data"]["token"].as_str().unwrap().to_string();
    let user_id = body["data"]["user"]["id"].as_str().unwrap().to_string();
    (token, user_id)
}

/// Create a post as the given caller; returns the post data object
pub async fn create_post(app: &Router, token: &str, title: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/posts",
        Some(token),
        Some(json!({ "title": title, "body": "some content", "tags": ["general"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create post failed");
    body["data"].clone()
}

/// Comment on a post; returns the comment data object
pub async fn create_comment(app: &Router, token: &str, post_id: &str, message: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        &format!("/api/posts/{}/comments", post_id),
        Some(token),
        Some(json!({ "message": message })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create comment failed");
    body["data"].clone()
}
