//! Shared harness for API integration tests.
//!
//! Builds the production router over a test pool, a temp-dir local
//! attachment store, and a fixed enrichment provider, so tests exercise the
//! same middleware stack (CORS, request ID, timeout, tracing, panic
//! recovery) that production uses.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use naturelog_api::auth::jwt::{generate_access_token, JwtConfig};
use naturelog_api::config::{ServerConfig, StorageBackend};
use naturelog_api::router::build_app_router;
use naturelog_api::state::AppState;
use naturelog_core::weather::WeatherSnapshot;
use naturelog_enrich::{FixedProvider, ResolvedPlace};
use naturelog_storage::{LocalStore, DEFAULT_MAX_UPLOAD_BYTES};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        storage_backend: StorageBackend::Local,
        storage_path: std::env::temp_dir()
            .join(format!("naturelog-api-test-{}", Uuid::new_v4()))
            .to_string_lossy()
            .into_owned(),
        s3_bucket: "unused".to_string(),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        geocode_url: "http://unused.invalid".to_string(),
        weather_url: "http://unused.invalid".to_string(),
        enrich_timeout_secs: 1,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router over the given pool, answering
/// enrichment lookups with a fixed place and weather snapshot.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_config(pool, test_config())
}

/// Build the router over an explicit config, for tests that need to
/// inspect the storage directory afterwards.
pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let enricher = FixedProvider::new(
        ResolvedPlace { locality: "Ely".into(), region: "Cambridgeshire".into() },
        WeatherSnapshot::Available {
            data: serde_json::json!({ "temperature": 14.2, "windspeed": 9.1 }),
            captured_at: chrono::Utc::now(),
        },
    );
    let store = LocalStore::new(config.storage_path.clone(), config.max_upload_bytes);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        store: Arc::new(store),
        enricher: Arc::new(enricher),
    };

    build_app_router(state, &config)
}

/// Build a router whose enrichment provider always fails, for exercising
/// the degraded paths.
pub fn build_test_app_without_enrichment(pool: PgPool) -> Router {
    let config = test_config();
    let store = LocalStore::new(config.storage_path.clone(), config.max_upload_bytes);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        store: Arc::new(store),
        enricher: Arc::new(FixedProvider::unavailable()),
    };

    build_app_router(state, &config)
}

/// Mint a bearer token for a test identity.
pub fn token_for(user_id: Uuid, display_name: &str) -> String {
    generate_access_token(user_id, display_name, &test_config().jwt).unwrap()
}

/// Issue a GET request without authentication.
pub async fn get(app: Router, path: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Issue a GET request with a bearer token.
pub async fn get_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(path)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a JSON POST request with a bearer token.
pub async fn post_json(
    app: Router,
    path: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(path)
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a DELETE request with a bearer token.
pub async fn delete_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(path)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Parse a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// One part of a handcrafted multipart body.
pub enum Part<'a> {
    Text { name: &'a str, value: &'a str },
    File { name: &'a str, filename: &'a str, content_type: &'a str, bytes: &'a [u8] },
}

pub const TEST_BOUNDARY: &str = "naturelog-test-boundary";

/// Assemble a `multipart/form-data` body from the given parts.
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{TEST_BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File { name, filename, content_type, bytes } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{TEST_BOUNDARY}--\r\n").as_bytes());
    body
}

/// Issue a multipart request (POST or PUT) with a bearer token.
pub async fn send_multipart(
    app: Router,
    method: &str,
    path: &str,
    token: &str,
    parts: &[Part<'_>],
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(path)
            .header("authorization", format!("Bearer {token}"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={TEST_BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap(),
    )
    .await
    .unwrap()
}
