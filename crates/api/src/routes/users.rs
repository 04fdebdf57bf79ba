use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /          -> list_users (admin)
/// GET    /{id}      -> get_user (self or admin)
/// PUT    /{id}      -> update_user (admin)
/// DELETE /{id}      -> deactivate_user (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(users::list_users)).route(
        "/{id}",
        get(users::get_user)
            .put(users::update_user)
            .delete(users::deactivate_user),
    )
}
