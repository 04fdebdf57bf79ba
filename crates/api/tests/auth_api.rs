//! HTTP-level integration tests for login, registration and token checks.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, get_auth, login, post_json, post_json_auth, seed_user, seed_user_with_token,
    TEST_PASSWORD,
};
use sqlx::PgPool;

use mediateca_api::auth::jwt::{generate_token, JwtConfig};
use mediateca_core::roles::Role;
use mediateca_db::repositories::UserRepo;

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_token_and_public_user(pool: PgPool) {
    let id = seed_user(&pool, "ana@example.com", Role::Journalist).await;
    let (app, _uploads) = common::build_test_app(pool.clone());

    let body = serde_json::json!({ "email": "ana@example.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["token"].is_string());
    assert_eq!(json["user"]["id"], id);
    assert_eq!(json["user"]["email"], "ana@example.com");
    assert_eq!(json["user"]["role"], "journalist");
    assert!(json["user"].get("password_hash").is_none());

    let user = UserRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert!(user.last_login_at.is_some(), "login must stamp last access");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_password_and_unknown_email_are_indistinguishable(pool: PgPool) {
    seed_user(&pool, "ana@example.com", Role::Viewer).await;
    let (app, _uploads) = common::build_test_app(pool);

    let wrong = post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "ana@example.com", "password": "not-it" }),
    )
    .await;
    let unknown = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "ghost@example.com", "password": "not-it" }),
    )
    .await;

    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(wrong).await, body_json(unknown).await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn email_lookup_is_case_sensitive(pool: PgPool) {
    seed_user(&pool, "ana@example.com", Role::Viewer).await;
    let (app, _uploads) = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "ANA@example.com", "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_account_cannot_log_in(pool: PgPool) {
    let id = seed_user(&pool, "gone@example.com", Role::Journalist).await;
    UserRepo::deactivate(&pool, id).await.unwrap();
    let (app, _uploads) = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "gone@example.com", "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Account is deactivated");
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_registers_user_who_can_then_log_in(pool: PgPool) {
    let (_admin, token) = seed_user_with_token(&pool, "admin@example.com", Role::Administrator).await;
    let (app, _uploads) = common::build_test_app(pool);

    let body = serde_json::json!({
        "name": "Berta",
        "email": "berta@example.com",
        "password": "hunter22",
        "role": "viewer",
    });
    let response = post_json_auth(app.clone(), "/api/v1/auth/register", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let user_id = body_json(response).await["user_id"].as_i64().unwrap();
    assert!(user_id > 0);

    let token = login(app.clone(), "berta@example.com", "hunter22").await;
    let me = body_json(get_auth(app, "/api/v1/auth/me", &token).await).await;
    assert_eq!(me["data"]["user_id"], user_id);
    assert_eq!(me["data"]["role"], "viewer");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_is_conflict(pool: PgPool) {
    let (_admin, token) = seed_user_with_token(&pool, "admin@example.com", Role::Administrator).await;
    let (app, _uploads) = common::build_test_app(pool);

    let body = serde_json::json!({
        "name": "Admin Again",
        "email": "admin@example.com",
        "password": "hunter22",
        "role": "journalist",
    });
    let response = post_json_auth(app, "/api/v1/auth/register", body, &token).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn registration_is_admin_only(pool: PgPool) {
    let (_j, token) = seed_user_with_token(&pool, "j@example.com", Role::Journalist).await;
    let (app, _uploads) = common::build_test_app(pool);

    let body = serde_json::json!({
        "name": "Carla",
        "email": "carla@example.com",
        "password": "hunter22",
        "role": "administrator",
    });
    let response = post_json_auth(app, "/api/v1/auth/register", body, &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn registration_validates_input(pool: PgPool) {
    let (_admin, token) = seed_user_with_token(&pool, "admin@example.com", Role::Administrator).await;
    let (app, _uploads) = common::build_test_app(pool);

    let short_password = serde_json::json!({
        "name": "Dana",
        "email": "dana@example.com",
        "password": "123",
        "role": "viewer",
    });
    let response =
        post_json_auth(app.clone(), "/api/v1/auth/register", short_password, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bad_role = serde_json::json!({
        "name": "Dana",
        "email": "dana@example.com",
        "password": "123456",
        "role": "editor",
    });
    let response = post_json_auth(app, "/api/v1/auth/register", bad_role, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Token verification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn garbage_and_foreign_tokens_are_rejected(pool: PgPool) {
    let id = seed_user(&pool, "ana@example.com", Role::Viewer).await;
    let (app, _uploads) = common::build_test_app(pool);

    let response = get_auth(app.clone(), "/api/v1/auth/me", "not-a-token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid token");

    let foreign = JwtConfig {
        secret: "some-other-secret".into(),
        expiry_hours: 24,
    };
    let token = generate_token(id, "ana@example.com", "viewer", &foreign).unwrap();
    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_of_deactivated_user_stops_working(pool: PgPool) {
    let (id, token) = seed_user_with_token(&pool, "ana@example.com", Role::Journalist).await;
    let (app, _uploads) = common::build_test_app(pool.clone());

    let response = get_auth(app.clone(), "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    UserRepo::deactivate(&pool, id).await.unwrap();

    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_comes_from_the_store_not_the_token(pool: PgPool) {
    let (id, _) = seed_user_with_token(&pool, "ana@example.com", Role::Viewer).await;
    // A token claiming a higher role than the account holds.
    let token = generate_token(id, "ana@example.com", "administrator", &common::test_jwt()).unwrap();
    let (app, _uploads) = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/users", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
