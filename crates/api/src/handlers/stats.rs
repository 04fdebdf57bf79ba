//! Handler for `GET /stats`.

use axum::extract::State;
use axum::Json;

use mediateca_db::models::stats::CatalogStats;
use mediateca_db::repositories::StatsRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/stats
///
/// Aggregate catalog counts. Administrator only.
pub async fn get_stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<CatalogStats>>> {
    let stats = StatsRepo::collect(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}
