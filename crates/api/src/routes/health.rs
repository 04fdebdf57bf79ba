//! Liveness probe. Mounted at the root, outside `/api/v1`.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when both backends answer, otherwise `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Whether the upload root is an accessible directory.
    pub storage_healthy: bool,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = mediateca_db::health_check(&state.pool).await.is_ok();
    let storage_healthy = tokio::fs::metadata(state.store.root())
        .await
        .is_ok_and(|m| m.is_dir());

    if !storage_healthy {
        tracing::warn!(root = %state.store.root().display(), "Upload root is not accessible");
    }

    Json(HealthResponse {
        status: if db_healthy && storage_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        storage_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
