//! Repository for the `assets` table and its association tables.

use sqlx::{PgPool, Postgres, Transaction};

use mediateca_core::types::DbId;

use crate::models::asset::{Asset, AssetAssociations, CreateAsset, UpdateAsset};
use crate::repositories::TagRepo;

/// Column list for `assets` queries.
const COLUMNS: &str = "\
    id, original_name, stored_name, storage_path, title, description, kind, \
    mime_type, size_bytes, extension, checksum_sha256, access_level, owner_id, \
    category_id, source, capture_place, captured_on, usage_rights, uploaded_at, \
    download_count, view_count, created_at, updated_at";

pub struct AssetRepo;

impl AssetRepo {
    /// Insert an asset together with its tag, collection and section links
    /// in one transaction. Any failure (e.g. an unknown collection id) rolls
    /// the whole write back.
    pub async fn create_with_associations(
        pool: &PgPool,
        input: &CreateAsset,
        links: &AssetAssociations,
    ) -> Result<Asset, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO assets (
                original_name, stored_name, storage_path, title, description, kind,
                mime_type, size_bytes, extension, checksum_sha256, access_level,
                owner_id, category_id, source, capture_place, captured_on, usage_rights
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
             RETURNING {COLUMNS}"
        );
        let asset = sqlx::query_as::<_, Asset>(&query)
            .bind(&input.original_name)
            .bind(&input.stored_name)
            .bind(&input.storage_path)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.kind.as_str())
            .bind(&input.mime_type)
            .bind(input.size_bytes)
            .bind(&input.extension)
            .bind(&input.checksum_sha256)
            .bind(input.access_level.as_str())
            .bind(input.owner_id)
            .bind(input.category_id)
            .bind(&input.source)
            .bind(&input.capture_place)
            .bind(input.captured_on)
            .bind(&input.usage_rights)
            .fetch_one(&mut *tx)
            .await?;

        TagRepo::attach_in_tx(&mut tx, asset.id, &links.tags).await?;
        Self::link_collections_inner(&mut tx, asset.id, &links.collection_ids).await?;
        Self::link_sections_inner(&mut tx, asset.id, &links.section_ids).await?;

        tx.commit().await?;
        Ok(asset)
    }

    /// Find an asset by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Atomically bump the download counter, treating `NULL` as 0.
    ///
    /// Returns the new count, or `None` if the asset no longer exists.
    pub async fn increment_download_count(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<i64>, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE assets SET download_count = COALESCE(download_count, 0) + 1 \
             WHERE id = $1 RETURNING download_count",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(count,)| count))
    }

    /// Atomically bump the view counter.
    pub async fn increment_view_count(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE assets SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a partial metadata edit and, when `input.tags` is set, replace
    /// the tag set. Both happen in one transaction.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE assets SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category_id = COALESCE($4, category_id),
                access_level = COALESCE($5, access_level),
                source = COALESCE($6, source),
                capture_place = COALESCE($7, capture_place),
                captured_on = COALESCE($8, captured_on),
                usage_rights = COALESCE($9, usage_rights)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category_id)
            .bind(input.access_level.map(|a| a.as_str()))
            .bind(&input.source)
            .bind(&input.capture_place)
            .bind(input.captured_on)
            .bind(&input.usage_rights)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(asset) = updated else {
            return Ok(None);
        };

        if let Some(tags) = &input.tags {
            TagRepo::replace_in_tx(&mut tx, asset.id, tags).await?;
        }

        tx.commit().await?;
        Ok(Some(asset))
    }

    /// Delete an asset row; associations cascade. Returns the deleted row so
    /// the caller can remove the stored binary.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("DELETE FROM assets WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn link_collections_inner(
        tx: &mut Transaction<'_, Postgres>,
        asset_id: DbId,
        collection_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        for &collection_id in collection_ids {
            sqlx::query(
                "INSERT INTO asset_collections (asset_id, collection_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(asset_id)
            .bind(collection_id)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn link_sections_inner(
        tx: &mut Transaction<'_, Postgres>,
        asset_id: DbId,
        section_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        for &section_id in section_ids {
            sqlx::query(
                "INSERT INTO asset_sections (asset_id, section_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(asset_id)
            .bind(section_id)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}
