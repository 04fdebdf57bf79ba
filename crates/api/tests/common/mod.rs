#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use mediateca_api::auth::jwt::{generate_token, JwtConfig};
use mediateca_api::auth::password::hash_password;
use mediateca_api::config::ServerConfig;
use mediateca_api::router::build_app_router;
use mediateca_api::state::AppState;
use mediateca_api::storage::MediaStore;
use mediateca_core::roles::Role;
use mediateca_core::types::DbId;
use mediateca_db::models::user::CreateUser;
use mediateca_db::repositories::UserRepo;

pub const TEST_PASSWORD: &str = "s3cret-pass";

const BOUNDARY: &str = "mediateca-test-boundary";

pub fn test_jwt() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-long-enough".to_string(),
        expiry_hours: 24,
    }
}

/// Build a test `ServerConfig` rooted at the given upload directory.
pub fn test_config(upload_path: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:4200".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 10,
        db_acquire_timeout_secs: 5,
        upload_path: upload_path.to_path_buf(),
        max_upload_bytes: 10 * 1024 * 1024,
        jwt: test_jwt(),
    }
}

/// Build the full application router over `pool`, storing uploads in a fresh
/// temporary directory. Keep the returned `TempDir` alive for the test.
pub fn build_test_app(pool: PgPool) -> (Router, TempDir) {
    let uploads = TempDir::new().expect("temp dir");
    let config = test_config(uploads.path());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        store: Arc::new(MediaStore::new(uploads.path())),
    };

    (build_app_router(state, &config), uploads)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert an active user that can log in with [`TEST_PASSWORD`].
pub async fn seed_user(pool: &PgPool, email: &str, role: Role) -> DbId {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            name: email.split('@').next().unwrap_or("user").to_string(),
            email: email.to_string(),
            password_hash,
            role: role.as_str().to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
    .id
}

/// Insert a user and mint a token for it without going through login.
pub async fn seed_user_with_token(pool: &PgPool, email: &str, role: Role) -> (DbId, String) {
    let id = seed_user(pool, email, role).await;
    let token = generate_token(id, email, role.as_str(), &test_jwt()).unwrap();
    (id, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn json_auth(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    json_auth(app, Method::POST, uri, body, token).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    json_auth(app, Method::PUT, uri, body, token).await
}

/// Log in through the API and return the bearer token.
pub async fn login(app: Router, email: &str, password: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

/// One part of a multipart upload.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    parts: &[Part<'_>],
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}

/// Upload a small JPEG with extra text fields and return the new asset id.
pub async fn upload(app: Router, token: &str, file_name: &str, fields: &[(&str, &str)]) -> DbId {
    let mut parts: Vec<Part<'_>> = fields
        .iter()
        .map(|(name, value)| Part::Text(name, value))
        .collect();
    parts.push(Part::File {
        file_name,
        content_type: "image/jpeg",
        data: b"\xFF\xD8\xFF\xE0fake-jpeg-payload",
    });

    let response = post_multipart_auth(app, "/api/v1/assets", &parts, token).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}
