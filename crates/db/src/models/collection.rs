use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use mediateca_core::types::{DbId, Timestamp};

/// A row from the `collections` table with its asset count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Collection {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<DbId>,
    pub asset_count: i64,
    pub created_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateCollection {
    pub name: String,
    pub description: Option<String>,
}
