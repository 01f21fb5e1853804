mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{create_post, register_and_login, send, test_app};

#[tokio::test]
async fn profile_routes_require_authentication() {
    let app = test_app();

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/profile/{}", Uuid::new_v4()),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_profile_is_404() {
    let app = test_app();
    let (token, _) = register_and_login(&app, "alice").await;

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/profile/{}", Uuid::new_v4()),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_bundles_the_user_with_their_posts() {
    let app = test_app();
    let (token, user_id) = register_and_login(&app, "prolific").await;
    let (other_token, _) = register_and_login(&app, "lurker").await;

    create_post(&app, &token, "first").await;
    create_post(&app, &token, "second").await;
    create_post(&app, &other_token, "someone else's").await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/profile/{}", user_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["username"], "prolific");
    assert!(body["data"]["user"].get("password_hash").is_none());

    let posts = body["data"]["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert!(posts.iter().all(|p| p["author"] == user_id.as_str()));
}

#[tokio::test]
async fn bio_update_round_trips_through_the_profile() {
    let app = test_app();
    let (token, user_id) = register_and_login(&app, "alice").await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/profile/{}/bio", user_id),
        Some(&token),
        Some(json!({ "bio": "rustacean and tea drinker" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["profile"]["bio"], "rustacean and tea drinker");

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/profile/{}", user_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["data"]["user"]["profile"]["bio"], "rustacean and tea drinker");
}

#[tokio::test]
async fn oversized_bio_is_rejected() {
    let app = test_app();
    let (token, user_id) = register_and_login(&app, "alice").await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/profile/{}/bio", user_id),
        Some(&token),
        Some(json!({ "bio": "b".repeat(201) })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"].get("bio").is_some());
}

#[tokio::test]
async fn bio_update_for_unknown_user_is_404() {
    let app = test_app();
    let (token, _) = register_and_login(&app, "alice").await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/profile/{}/bio", Uuid::new_v4()),
        Some(&token),
        Some(json!({ "bio": "ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn avatar_update_stores_the_hosted_url() {
    let app = test_app();
    let (token, user_id) = register_and_login(&app, "alice").await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/profile/{}/avatar", user_id),
        Some(&token),
        Some(json!({ "avatar": "https://cdn.example/raw-selfie.png" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The stored URL comes from the image host, not the raw source
    let avatar = body["data"]["profile"]["avatar"].as_str().unwrap();
    assert!(avatar.starts_with("https://images.quill.local/avatars/"));
}

#[tokio::test]
async fn avatar_source_must_be_a_url() {
    let app = test_app();
    let (token, user_id) = register_and_login(&app, "alice").await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/profile/{}/avatar", user_id),
        Some(&token),
        Some(json!({ "avatar": "definitely not a url" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"].get("avatar").is_some());
}
