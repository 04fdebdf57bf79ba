//! Tag model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use mediateca_core::types::{DbId, Timestamp};

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// Tag with the number of assets carrying it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TagWithUsage {
    pub id: DbId,
    pub name: String,
    pub usage_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateTag {
    pub name: String,
}
