//! Handlers for the `/tags` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use mediateca_core::error::CoreError;
use mediateca_db::models::tag::{CreateTag, Tag, TagWithUsage};
use mediateca_db::repositories::TagRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireContributor};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tags
///
/// All tags with how many assets carry each.
pub async fn list_tags(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<TagWithUsage>>>> {
    let tags = TagRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// POST /api/v1/tags
///
/// Create a tag. An existing name is a 409 via `uq_tags_name`.
pub async fn create_tag(
    State(state): State<AppState>,
    RequireContributor(user): RequireContributor,
    Json(input): Json<CreateTag>,
) -> AppResult<(StatusCode, Json<DataResponse<Tag>>)> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Tag name must not be empty".into(),
        )));
    }

    let tag = TagRepo::create(&state.pool, name).await?;
    tracing::info!(tag_id = tag.id, user_id = user.user_id, "Tag created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: tag })))
}
