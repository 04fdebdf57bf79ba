//! Repository for the `tags` table.

use sqlx::{PgPool, Postgres, Transaction};

use mediateca_core::types::DbId;

use crate::models::tag::{Tag, TagWithUsage};

const COLUMNS: &str = "id, name, created_at";

/// Get-or-create in a single statement. The no-op `DO UPDATE` makes
/// `RETURNING` yield the existing row on conflict.
const UPSERT: &str = "INSERT INTO tags (name) VALUES ($1) \
                      ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
                      RETURNING id, name, created_at";

pub struct TagRepo;

impl TagRepo {
    /// All tags with their usage counts, most used first.
    pub async fn list(pool: &PgPool) -> Result<Vec<TagWithUsage>, sqlx::Error> {
        sqlx::query_as::<_, TagWithUsage>(
            "SELECT t.id, t.name, COUNT(at2.asset_id) AS usage_count \
             FROM tags t \
             LEFT JOIN asset_tags at2 ON at2.tag_id = t.id \
             GROUP BY t.id, t.name \
             ORDER BY usage_count DESC, t.name",
        )
        .fetch_all(pool)
        .await
    }

    /// Strict insert; a duplicate name violates `uq_tags_name`.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Tag, sqlx::Error> {
        let query = format!("INSERT INTO tags (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Tag>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Idempotent get-or-create.
    pub async fn create_or_get(pool: &PgPool, name: &str) -> Result<Tag, sqlx::Error> {
        sqlx::query_as::<_, Tag>(UPSERT)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Link `names` to an asset inside an open transaction, creating missing
    /// tags. Already-linked tags are skipped.
    ///
    /// Tag rows are upserted in one statement in name order, so concurrent
    /// transactions always lock shared tags in the same sequence.
    pub(crate) async fn attach_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        asset_id: DbId,
        names: &[String],
    ) -> Result<(), sqlx::Error> {
        let mut names = names.to_vec();
        names.sort();
        names.dedup();
        if names.is_empty() {
            return Ok(());
        }

        let linked = sqlx::query(
            "WITH upserted AS ( \
                 INSERT INTO tags (name) \
                 SELECT DISTINCT n FROM unnest($2::TEXT[]) AS n ORDER BY n \
                 ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
                 RETURNING id \
             ) \
             INSERT INTO asset_tags (asset_id, tag_id) \
             SELECT $1, id FROM upserted \
             ON CONFLICT DO NOTHING",
        )
        .bind(asset_id)
        .bind(&names)
        .execute(&mut **tx)
        .await?
        .rows_affected();

        tracing::debug!(asset_id, tags = names.len(), linked, "Attached tags to asset");
        Ok(())
    }

    /// Replace the whole tag set of an asset.
    pub(crate) async fn replace_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        asset_id: DbId,
        names: &[String],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM asset_tags WHERE asset_id = $1")
            .bind(asset_id)
            .execute(&mut **tx)
            .await?;
        Self::attach_in_tx(tx, asset_id, names).await
    }
}
