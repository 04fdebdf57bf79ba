//! Repository for the `categories` table.

use sqlx::PgPool;

use mediateca_core::types::DbId;

use crate::models::category::{Category, CreateCategory};

/// Select list resolving one level of parent name.
const SELECT: &str = "SELECT c.id, c.name, c.description, c.parent_id, \
                      p.name AS parent_name, c.created_at \
                      FROM categories c \
                      LEFT JOIN categories p ON p.id = c.parent_id";

pub struct CategoryRepo;

impl CategoryRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("{SELECT} ORDER BY c.name, c.id");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("{SELECT} WHERE c.id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a category. An unknown `parent_id` fails with a foreign-key
    /// violation.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO categories (name, description, parent_id) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.parent_id)
        .fetch_one(pool)
        .await?;

        let query = format!("{SELECT} WHERE c.id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
