use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::MediaStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, created once in `main`.
    pub pool: mediateca_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Local filesystem store holding uploaded binaries.
    pub store: Arc<MediaStore>,
}
