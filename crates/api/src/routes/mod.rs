pub mod assets;
pub mod auth;
pub mod categories;
pub mod collections;
pub mod health;
pub mod sections;
pub mod tags;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::config::ServerConfig;
use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                      login (public)
/// /auth/register                   create user (admin)
/// /auth/me                         verified identity
///
/// /users                           list (admin)
/// /users/{id}                      get (self or admin), update, deactivate (admin)
///
/// /categories                      list, create
/// /tags                            list, create
/// /collections                     list, create
/// /sections                        list, create (admin)
///
/// /assets                          list (paged, filtered), upload (multipart)
/// /assets/{id}                     get, update, delete
/// /assets/{id}/download            stream binary
///
/// /search                          free-text search (capped)
/// /stats                           catalog statistics (admin)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/categories", categories::router())
        .nest("/tags", tags::router())
        .nest("/collections", collections::router())
        .nest("/sections", sections::router())
        .nest("/assets", assets::router(config.max_upload_bytes))
        .route("/search", get(handlers::search::search_assets))
        .route("/stats", get(handlers::stats::get_stats))
}
