//! Category model. Categories form a shallow tree through `parent_id`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use mediateca_core::types::{DbId, Timestamp};

/// A category together with its parent's name, as listed by the API.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub parent_name: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
}
