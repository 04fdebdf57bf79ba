//! Repository for the `sections` table.

use sqlx::PgPool;

use crate::models::section::{CreateSection, Section};

const COLUMNS: &str = "id, name, description, created_at";

pub struct SectionRepo;

impl SectionRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<Section>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sections ORDER BY name");
        sqlx::query_as::<_, Section>(&query).fetch_all(pool).await
    }

    /// Insert a section; a duplicate name violates `uq_sections_name`.
    pub async fn create(pool: &PgPool, input: &CreateSection) -> Result<Section, sqlx::Error> {
        let query = format!(
            "INSERT INTO sections (name, description) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }
}
