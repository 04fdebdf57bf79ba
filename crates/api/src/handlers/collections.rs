//! Handlers for the `/collections` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use mediateca_core::error::CoreError;
use mediateca_db::models::collection::{Collection, CreateCollection};
use mediateca_db::repositories::CollectionRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireContributor};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/collections
pub async fn list_collections(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Collection>>>> {
    let collections = CollectionRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: collections }))
}

/// POST /api/v1/collections
pub async fn create_collection(
    State(state): State<AppState>,
    RequireContributor(user): RequireContributor,
    Json(mut input): Json<CreateCollection>,
) -> AppResult<(StatusCode, Json<DataResponse<Collection>>)> {
    input.name = input.name.trim().to_string();
    if input.name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Collection name must not be empty".into(),
        )));
    }

    let collection = CollectionRepo::create(&state.pool, &input, user.user_id).await?;
    tracing::info!(collection_id = collection.id, user_id = user.user_id, "Collection created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: collection })))
}
