mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{create_post, register_and_login, send, test_app};

#[tokio::test]
async fn empty_board_lists_as_empty_array() {
    let app = test_app();

    let (status, body) = send(&app, "GET", "/api/posts", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn posts_list_newest_first_with_authors_populated() {
    let app = test_app();
    let (token, user_id) = register_and_login(&app, "alice").await;

    create_post(&app, &token, "older post").await;
    create_post(&app, &token, "newer post").await;

    let (status, body) = send(&app, "GET", "/api/posts", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let posts = body["data"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["title"], "newer post");
    assert_eq!(posts[1]["title"], "older post");
    assert_eq!(posts[0]["author"]["username"], "alice");
    assert_eq!(posts[0]["author"]["id"], user_id.as_str());
}

#[tokio::test]
async fn created_post_records_the_caller_as_author() {
    let app = test_app();
    let (token, user_id) = register_and_login(&app, "bob").await;

    let post = create_post(&app, &token, "my post").await;
    assert_eq!(post["author"], user_id.as_str());
    assert_eq!(post["tags"], json!(["general"]));
    assert_eq!(post["comments"], json!([]));
}

#[tokio::test]
async fn post_input_validation_is_422() {
    let app = test_app();
    let (token, _) = register_and_login(&app, "carol").await;

    for bad in [
        json!({ "title": "t", "body": "b", "tags": [] }),
        json!({ "title": "t", "body": "b", "tags": ["ok", 3] }),
        json!({ "title": "t", "body": "b" }),
        json!({ "body": "b", "tags": ["x"] }),
    ] {
        let (status, body) = send(&app, "POST", "/api/posts", Some(&token), Some(bad)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "UNPROCESSABLE_ENTITY");
    }
}

#[tokio::test]
async fn missing_post_is_404_and_bad_id_is_400() {
    let app = test_app();

    let (status, _) = send(&app, "GET", &format!("/api/posts/{}", Uuid::new_v4()), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/posts/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_the_owner_can_update_a_post() {
    let app = test_app();
    let (token_a, _) = register_and_login(&app, "owner").await;
    let (token_b, _) = register_and_login(&app, "intruder").await;

    let post = create_post(&app, &token_a, "original title").await;
    let post_id = post["id"].as_str().unwrap();
    let update = json!({ "title": "new title", "body": "some content", "tags": ["general"] });

    // Authenticated non-owner is refused and the post is unchanged
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/posts/{}", post_id),
        Some(&token_b),
        Some(update.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = send(&app, "GET", &format!("/api/posts/{}", post_id), None, None).await;
    assert_eq!(body["data"]["title"], "original title");

    // The owner performing the same call succeeds
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/posts/{}", post_id),
        Some(&token_a),
        Some(update),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "new title");

    let (_, body) = send(&app, "GET", &format!("/api/posts/{}", post_id), None, None).await;
    assert_eq!(body["data"]["title"], "new title");
}

#[tokio::test]
async fn only_the_owner_can_delete_a_post() {
    let app = test_app();
    let (token_a, _) = register_and_login(&app, "owner").await;
    let (token_b, _) = register_and_login(&app, "intruder").await;

    let post = create_post(&app, &token_a, "doomed").await;
    let post_id = post["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/posts/{}", post_id),
        Some(&token_b),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/posts/{}", post_id),
        Some(&token_a),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/posts/{}", post_id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/api/posts", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn updating_a_missing_post_is_404() {
    let app = test_app();
    let (token, _) = register_and_login(&app, "alice").await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/posts/{}", Uuid::new_v4()),
        Some(&token),
        Some(json!({ "title": "t", "body": "b", "tags": ["x"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
