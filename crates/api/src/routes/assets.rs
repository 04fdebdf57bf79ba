use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Routes mounted at `/assets`.
///
/// ```text
/// GET    /                 -> list_assets
/// POST   /                 -> create_asset (multipart, body capped at `max_upload_bytes`)
/// GET    /{id}             -> get_asset
/// PUT    /{id}             -> update_asset (owner or admin)
/// DELETE /{id}             -> delete_asset (owner or admin)
/// GET    /{id}/download    -> download_asset
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(assets::list_assets)
                .post(assets::create_asset)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/{id}",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/{id}/download", get(assets::download_asset))
}
