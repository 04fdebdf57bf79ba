//! Handlers for the `/sections` resource (editorial sections).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use mediateca_core::error::CoreError;
use mediateca_db::models::section::{CreateSection, Section};
use mediateca_db::repositories::SectionRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/sections
pub async fn list_sections(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Section>>>> {
    let sections = SectionRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: sections }))
}

/// POST /api/v1/sections
///
/// Administrator only. Duplicate names are a 409 via `uq_sections_name`.
pub async fn create_section(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(mut input): Json<CreateSection>,
) -> AppResult<(StatusCode, Json<DataResponse<Section>>)> {
    input.name = input.name.trim().to_string();
    if input.name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Section name must not be empty".into(),
        )));
    }

    let section = SectionRepo::create(&state.pool, &input).await?;
    tracing::info!(section_id = section.id, user_id = admin.user_id, "Section created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: section })))
}
