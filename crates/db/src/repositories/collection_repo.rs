//! Repository for the `collections` table.

use sqlx::PgPool;

use mediateca_core::types::DbId;

use crate::models::collection::{Collection, CreateCollection};

const SELECT: &str = "SELECT c.id, c.name, c.description, c.created_by, \
                      (SELECT COUNT(*) FROM asset_collections ac WHERE ac.collection_id = c.id) \
                          AS asset_count, \
                      c.created_at \
                      FROM collections c";

pub struct CollectionRepo;

impl CollectionRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<Collection>, sqlx::Error> {
        let query = format!("{SELECT} ORDER BY c.name, c.id");
        sqlx::query_as::<_, Collection>(&query).fetch_all(pool).await
    }

    pub async fn create(
        pool: &PgPool,
        input: &CreateCollection,
        created_by: DbId,
    ) -> Result<Collection, sqlx::Error> {
        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO collections (name, description, created_by) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(created_by)
        .fetch_one(pool)
        .await?;

        let query = format!("{SELECT} WHERE c.id = $1");
        sqlx::query_as::<_, Collection>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
