//! Asset models and DTOs.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

use mediateca_core::access::AccessLevel;
use mediateca_core::media::MediaKind;
use mediateca_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub original_name: String,
    pub stored_name: String,
    /// Path of the binary relative to the media store root.
    pub storage_path: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub extension: String,
    pub checksum_sha256: String,
    pub access_level: String,
    pub owner_id: DbId,
    pub category_id: Option<DbId>,
    pub source: Option<String>,
    pub capture_place: Option<String>,
    pub captured_on: Option<NaiveDate>,
    pub usage_rights: Option<String>,
    pub uploaded_at: Timestamp,
    /// `NULL` until the first download.
    pub download_count: Option<i64>,
    pub view_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Asset as returned by catalog listings, search and detail: joined
/// category and owner names plus sorted, distinct association names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CatalogEntry {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub original_name: String,
    pub stored_name: String,
    pub kind: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub extension: String,
    pub checksum_sha256: String,
    pub access_level: String,
    pub owner_id: DbId,
    pub owner_name: String,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub source: Option<String>,
    pub capture_place: Option<String>,
    pub captured_on: Option<NaiveDate>,
    pub usage_rights: Option<String>,
    pub uploaded_at: Timestamp,
    pub download_count: i64,
    pub view_count: i64,
    pub tags: Vec<String>,
    pub collections: Vec<String>,
    pub sections: Vec<String>,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Catalog record for a freshly stored binary.
#[derive(Debug, Clone)]
pub struct CreateAsset {
    pub original_name: String,
    pub stored_name: String,
    pub storage_path: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: MediaKind,
    pub mime_type: String,
    pub size_bytes: i64,
    pub extension: String,
    pub checksum_sha256: String,
    pub access_level: AccessLevel,
    pub owner_id: DbId,
    pub category_id: Option<DbId>,
    pub source: Option<String>,
    pub capture_place: Option<String>,
    pub captured_on: Option<NaiveDate>,
    pub usage_rights: Option<String>,
}

/// Associations written together with a new asset. Lists must already be
/// deduplicated.
#[derive(Debug, Clone, Default)]
pub struct AssetAssociations {
    pub tags: Vec<String>,
    pub collection_ids: Vec<DbId>,
    pub section_ids: Vec<DbId>,
}

/// Partial metadata edit. `None` leaves a column unchanged; `tags: Some(_)`
/// replaces the whole tag set.
#[derive(Debug, Clone, Default)]
pub struct UpdateAsset {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub access_level: Option<AccessLevel>,
    pub source: Option<String>,
    pub capture_place: Option<String>,
    pub captured_on: Option<NaiveDate>,
    pub usage_rights: Option<String>,
    pub tags: Option<Vec<String>>,
}
