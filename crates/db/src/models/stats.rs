//! Aggregate catalog statistics.

use serde::Serialize;
use sqlx::FromRow;

/// One bucket of a grouped count (`kind`, `access_level`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CountByKey {
    pub key: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub total_assets: i64,
    pub total_users: i64,
    pub total_downloads: i64,
    pub total_bytes: i64,
    pub by_kind: Vec<CountByKey>,
    pub by_access_level: Vec<CountByKey>,
}
