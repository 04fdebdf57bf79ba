use axum::routing::get;
use axum::Router;

use crate::handlers::collections;
use crate::state::AppState;

/// Routes mounted at `/collections`.
///
/// ```text
/// GET  /    -> list_collections
/// POST /    -> create_collection
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(collections::list_collections).post(collections::create_collection))
}
