mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{create_comment, create_post, register_and_login, send, test_app};

#[tokio::test]
async fn commenting_on_a_missing_post_is_422_and_persists_nothing() {
    let app = test_app();
    let (token, _) = register_and_login(&app, "alice").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/posts/{}/comments", Uuid::new_v4()),
        Some(&token),
        Some(json!({ "message": "hello?" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Post not found");
}

#[tokio::test]
async fn comment_appears_on_the_post_detail_with_author_populated() {
    let app = test_app();
    let (token, user_id) = register_and_login(&app, "alice").await;

    let post = create_post(&app, &token, "discussion").await;
    let post_id = post["id"].as_str().unwrap();
    let comment = create_comment(&app, &token, post_id, "first!").await;
    assert_eq!(comment["author"], user_id.as_str());

    let (status, body) = send(&app, "GET", &format!("/api/posts/{}", post_id), None, None).await;
    assert_eq!(status, StatusCode::OK);

    let comments = body["data"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["message"], "first!");
    assert_eq!(comments[0]["author"]["username"], "alice");
}

#[tokio::test]
async fn only_the_author_can_edit_a_comment() {
    let app = test_app();
    let (token_a, _) = register_and_login(&app, "author").await;
    let (token_b, _) = register_and_login(&app, "other").await;

    let post = create_post(&app, &token_a, "post").await;
    let comment = create_comment(&app, &token_a, post["id"].as_str().unwrap(), "original").await;
    let comment_id = comment["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/comments/{}", comment_id),
        Some(&token_b),
        Some(json!({ "message": "hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/comments/{}", comment_id),
        Some(&token_a),
        Some(json!({ "message": "edited" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "edited");
}

#[tokio::test]
async fn missing_comment_is_404_on_update_and_delete_alike() {
    let app = test_app();
    let (token, _) = register_and_login(&app, "alice").await;
    let gone = Uuid::new_v4();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/comments/{}", gone),
        Some(&token),
        Some(json!({ "message": "anyone home?" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/comments/{}", gone),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_comment_disappears_from_the_post_detail() {
    let app = test_app();
    let (token, _) = register_and_login(&app, "alice").await;

    let post = create_post(&app, &token, "post").await;
    let post_id = post["id"].as_str().unwrap();
    let comment = create_comment(&app, &token, post_id, "fleeting").await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/comments/{}", comment["id"].as_str().unwrap()),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The post still holds a dangling reference; the detail view skips it
    let (status, body) = send(&app, "GET", &format!("/api/posts/{}", post_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["comments"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn deleting_a_post_orphans_its_comments_without_error() {
    let app = test_app();
    let (token, _) = register_and_login(&app, "alice").await;

    let post = create_post(&app, &token, "short lived").await;
    let post_id = post["id"].as_str().unwrap().to_string();
    let comment = create_comment(&app, &token, &post_id, "left behind").await;

    let (status, _) = send(&app, "DELETE", &format!("/api/posts/{}", post_id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The deleted post never re-surfaces
    let (_, body) = send(&app, "GET", "/api/posts", None, None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    // The orphaned comment is still there and still editable by its author
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/comments/{}", comment["id"].as_str().unwrap()),
        Some(&token),
        Some(json!({ "message": "still here" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "still here");
}

#[tokio::test]
async fn oversized_comment_message_is_rejected() {
    let app = test_app();
    let (token, _) = register_and_login(&app, "alice").await;
    let post = create_post(&app, &token, "post").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/posts/{}/comments", post["id"].as_str().unwrap()),
        Some(&token),
        Some(json!({ "message": "a".repeat(1001) })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"].get("message").is_some());
}
