//! Handlers for the `/categories` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use mediateca_core::error::CoreError;
use mediateca_db::models::category::{Category, CreateCategory};
use mediateca_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireContributor};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
///
/// All categories with their parent's name resolved.
pub async fn list_categories(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/categories
pub async fn create_category(
    State(state): State<AppState>,
    RequireContributor(user): RequireContributor,
    Json(mut input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    input.name = input.name.trim().to_string();
    if input.name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Category name must not be empty".into(),
        )));
    }

    if let Some(parent_id) = input.parent_id {
        if CategoryRepo::find_by_id(&state.pool, parent_id).await?.is_none() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Parent category {parent_id} does not exist"
            ))));
        }
    }

    let category = CategoryRepo::create(&state.pool, &input).await?;
    tracing::info!(category_id = category.id, user_id = user.user_id, "Category created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}
