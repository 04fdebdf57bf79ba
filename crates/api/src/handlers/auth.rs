//! Handlers for the `/auth` resource (login, register, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use mediateca_core::error::CoreError;
use mediateca_core::roles::Role;
use mediateca_core::types::DbId;

use crate::auth::service::{self, LoginOutcome};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: DbId,
}

/// Verified identity of the caller.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: DbId,
    pub email: String,
    pub role: Role,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns a bearer token and the
/// public user summary.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginOutcome>> {
    let outcome =
        service::authenticate(&state.pool, &state.config.jwt, &input.email, &input.password)
            .await?;
    Ok(Json(outcome))
}

/// POST /api/v1/auth/register
///
/// Create a user. Administrator only.
pub async fn register(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    let role: Role = input.role.trim().parse()?;

    let user_id =
        service::register(&state.pool, input.name.trim(), &input.email, &input.password, role)
            .await?;

    tracing::info!(user_id, created_by = admin.user_id, "User created by administrator");
    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id })))
}

/// GET /api/v1/auth/me
pub async fn me(RequireAuth(user): RequireAuth) -> Json<DataResponse<MeResponse>> {
    Json(DataResponse {
        data: MeResponse {
            user_id: user.user_id,
            email: user.email,
            role: user.role,
        },
    })
}
