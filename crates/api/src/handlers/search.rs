//! Handler for `GET /search`: free-text search over the visible catalog.

use axum::extract::{Query, State};
use axum::Json;

use mediateca_core::access::VisibilityScope;
use mediateca_core::catalog::SEARCH_RESULT_CAP;
use mediateca_db::models::asset::CatalogEntry;
use mediateca_db::repositories::CatalogRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::query::SearchParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/search?q=...
///
/// Matches title, description, original filename and tag names. Results
/// are capped and unpaged.
pub async fn search_assets(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<CatalogEntry>>>> {
    let filter = params.to_filter()?;
    let scope = VisibilityScope::for_caller(user.role, user.user_id);

    let results = CatalogRepo::search(&state.pool, &scope, &filter, SEARCH_RESULT_CAP).await?;
    tracing::debug!(user_id = user.user_id, hits = results.len(), "Catalog search");
    Ok(Json(DataResponse { data: results }))
}
