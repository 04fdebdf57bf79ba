//! Handlers for the `/users` resource.
//!
//! Listing and edits are administrator-only; a user may read their own
//! record. Users are never hard-deleted.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use mediateca_core::error::CoreError;
use mediateca_core::roles::Role;
use mediateca_core::types::DbId;
use mediateca_db::models::user::{UpdateUser, UserResponse};
use mediateca_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /users/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    let data = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/users/{id}
///
/// Self or administrator.
pub async fn get_user(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if caller.user_id != id && caller.role != Role::Administrator {
        return Err(AppError::Core(CoreError::Forbidden(
            "You may only view your own account".into(),
        )));
    }

    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PUT /api/v1/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let role = input
        .role
        .as_deref()
        .map(|r| r.trim().parse::<Role>())
        .transpose()?;

    if admin.user_id == id
        && (input.is_active == Some(false) || role.is_some_and(|r| r != Role::Administrator))
    {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot deactivate or demote your own account".into(),
        )));
    }

    let update = UpdateUser {
        name: input.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        email: input.email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
        role: role.map(|r| r.as_str().to_string()),
        is_active: input.is_active,
    };

    let user = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(user_id = id, admin_id = admin.user_id, "User updated");
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// DELETE /api/v1/users/{id}
///
/// Soft-deactivate. An administrator cannot deactivate themselves.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if admin.user_id == id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot deactivate your own account".into(),
        )));
    }

    if !UserRepo::deactivate(&state.pool, id).await? {
        // Either unknown or already inactive.
        if UserRepo::find_by_id(&state.pool, id).await?.is_none() {
            return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
        }
    }

    tracing::info!(user_id = id, admin_id = admin.user_id, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}
