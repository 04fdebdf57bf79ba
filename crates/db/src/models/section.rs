use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use mediateca_core::types::{DbId, Timestamp};

/// Editorial section (e.g. "Politics", "Sports").
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Section {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateSection {
    pub name: String,
    pub description: Option<String>,
}
