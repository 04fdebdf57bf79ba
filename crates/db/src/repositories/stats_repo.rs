//! Aggregate counts for the admin dashboard.

use sqlx::PgPool;

use crate::models::stats::{CatalogStats, CountByKey};

pub struct StatsRepo;

impl StatsRepo {
    pub async fn collect(pool: &PgPool) -> Result<CatalogStats, sqlx::Error> {
        let (total_assets, total_downloads, total_bytes): (i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), \
                    COALESCE(SUM(COALESCE(download_count, 0)), 0)::BIGINT, \
                    COALESCE(SUM(size_bytes), 0)::BIGINT \
             FROM assets",
        )
        .fetch_one(pool)
        .await?;

        let (total_users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        let by_kind = sqlx::query_as::<_, CountByKey>(
            "SELECT kind AS key, COUNT(*) AS count FROM assets GROUP BY kind ORDER BY kind",
        )
        .fetch_all(pool)
        .await?;

        let by_access_level = sqlx::query_as::<_, CountByKey>(
            "SELECT access_level AS key, COUNT(*) AS count FROM assets \
             GROUP BY access_level ORDER BY access_level",
        )
        .fetch_all(pool)
        .await?;

        Ok(CatalogStats {
            total_assets,
            total_users,
            total_downloads,
            total_bytes,
            by_kind,
            by_access_level,
        })
    }
}
