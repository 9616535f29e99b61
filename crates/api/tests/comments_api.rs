//! Integration tests for the comment endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json, send_multipart, token_for, Part};
use sqlx::PgPool;
use uuid::Uuid;

async fn create_entry(app: axum::Router, token: &str, is_public: bool) -> String {
    let metadata = serde_json::json!({
        "title": "Herons at the weir",
        "body_html": "<p>Two grey herons fishing.</p>",
        "category": "Birds",
        "place_name": "Ely, Cambridgeshire",
        "display_date": "12 April 2025",
        "is_public": is_public,
    })
    .to_string();
    let response = send_multipart(
        app,
        "POST",
        "/api/v1/entries",
        token,
        &[Part::Text { name: "metadata", value: &metadata }],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_str().unwrap().to_string()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn any_reader_can_comment_on_public_entry(pool: PgPool) {
    let app = common::build_test_app(pool);
    let author_token = token_for(Uuid::new_v4(), "Robin");
    let reader_token = token_for(Uuid::new_v4(), "Wren");

    let id = create_entry(app.clone(), &author_token, true).await;
    let path = format!("/api/v1/entries/{id}/comments");

    let response = post_json(
        app.clone(),
        &path,
        &reader_token,
        serde_json::json!({ "body": "Lovely spot!" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let comments = json["data"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["body"], "Lovely spot!");
    assert_eq!(comments[0]["author_display_name"], "Wren");

    // The thread also reads back through the list endpoint, anonymously.
    let response = get(app, &path).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_comment_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for(Uuid::new_v4(), "Robin");

    let id = create_entry(app.clone(), &token, true).await;
    let path = format!("/api/v1/entries/{id}/comments");

    let response =
        post_json(app, &path, &token, serde_json::json!({ "body": "   " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn private_entry_thread_is_owner_only(pool: PgPool) {
    let app = common::build_test_app(pool);
    let author_token = token_for(Uuid::new_v4(), "Robin");
    let stranger_token = token_for(Uuid::new_v4(), "Wren");

    let id = create_entry(app.clone(), &author_token, false).await;
    let path = format!("/api/v1/entries/{id}/comments");

    let response = post_json(
        app.clone(),
        &path,
        &stranger_token,
        serde_json::json!({ "body": "Hello?" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get(app.clone(), &path).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The author still sees their own thread.
    let response = post_json(
        app,
        &path,
        &author_token,
        serde_json::json!({ "body": "A note to self." }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}
