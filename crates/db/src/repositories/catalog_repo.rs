//! Catalog query engine: visibility-scoped listing, counting and search
//! over assets.
//!
//! Listing and counting share [`PREDICATE`] and [`bind_predicate`], so the
//! reported `total` always matches the rows that paging walks through.

use chrono::NaiveDate;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use mediateca_core::access::VisibilityScope;
use mediateca_core::catalog::{like_pattern, CatalogFilter, PageRequest};
use mediateca_core::types::DbId;

use crate::models::asset::CatalogEntry;

/// Asset columns plus joined names and sorted association arrays.
const ENTRY_SELECT: &str = "\
    SELECT a.id, a.title, a.description, a.original_name, a.stored_name, a.kind, \
           a.mime_type, a.size_bytes, a.extension, a.checksum_sha256, a.access_level, \
           a.owner_id, u.name AS owner_name, a.category_id, c.name AS category_name, \
           a.source, a.capture_place, a.captured_on, a.usage_rights, a.uploaded_at, \
           COALESCE(a.download_count, 0) AS download_count, a.view_count, \
           ARRAY(SELECT DISTINCT tg.name FROM asset_tags atg \
                 JOIN tags tg ON tg.id = atg.tag_id \
                 WHERE atg.asset_id = a.id ORDER BY tg.name) AS tags, \
           ARRAY(SELECT DISTINCT co.name FROM asset_collections aco \
                 JOIN collections co ON co.id = aco.collection_id \
                 WHERE aco.asset_id = a.id ORDER BY co.name) AS collections, \
           ARRAY(SELECT DISTINCT se.name FROM asset_sections ase \
                 JOIN sections se ON se.id = ase.section_id \
                 WHERE ase.asset_id = a.id ORDER BY se.name) AS sections \
    FROM assets a \
    JOIN users u ON u.id = a.owner_id \
    LEFT JOIN categories c ON c.id = a.category_id";

/// Visibility rule AND every optional filter. Parameters `$1`..`$12` are
/// bound by [`bind_predicate`]; a `NULL` (or empty array) disables a filter.
const PREDICATE: &str = "\
    (a.access_level = ANY($1::TEXT[]) OR a.owner_id = $2::BIGINT) \
    AND ($3::TEXT IS NULL OR a.kind = $3) \
    AND ($4::BIGINT IS NULL OR a.category_id = $4) \
    AND ($5::BIGINT IS NULL OR EXISTS ( \
        SELECT 1 FROM asset_sections fs \
        WHERE fs.asset_id = a.id AND fs.section_id = $5)) \
    AND ($6::TEXT IS NULL OR a.access_level = $6) \
    AND ($7::TEXT IS NULL \
        OR a.title ILIKE $7 \
        OR a.description ILIKE $7 \
        OR a.original_name ILIKE $7 \
        OR ($8::BOOLEAN AND EXISTS ( \
            SELECT 1 FROM asset_tags qt JOIN tags qg ON qg.id = qt.tag_id \
            WHERE qt.asset_id = a.id AND qg.name ILIKE $7))) \
    AND ($9::DATE IS NULL OR a.captured_on >= $9) \
    AND ($10::DATE IS NULL OR a.captured_on <= $10) \
    AND (cardinality($11::TEXT[]) = 0 OR EXISTS ( \
        SELECT 1 FROM asset_tags ft JOIN tags fg ON fg.id = ft.tag_id \
        WHERE ft.asset_id = a.id AND fg.name = ANY($11))) \
    AND ($12::BIGINT IS NULL OR EXISTS ( \
        SELECT 1 FROM asset_collections fc \
        WHERE fc.asset_id = a.id AND fc.collection_id = $12))";

const ORDER: &str = "ORDER BY a.uploaded_at DESC, a.id DESC";

/// Owned bind values for [`PREDICATE`].
struct PredicateBinds {
    levels: Vec<String>,
    owner_id: Option<DbId>,
    kind: Option<&'static str>,
    category_id: Option<DbId>,
    section_id: Option<DbId>,
    access_level: Option<&'static str>,
    text_pattern: Option<String>,
    text_matches_tags: bool,
    captured_from: Option<NaiveDate>,
    captured_to: Option<NaiveDate>,
    tags: Vec<String>,
    collection_id: Option<DbId>,
}

impl PredicateBinds {
    fn new(scope: &VisibilityScope, filter: &CatalogFilter) -> Self {
        Self {
            levels: scope.level_names(),
            owner_id: scope.owner_id,
            kind: filter.kind.map(|k| k.as_str()),
            category_id: filter.category_id,
            section_id: filter.section_id,
            access_level: filter.access_level.map(|a| a.as_str()),
            text_pattern: filter.text.as_deref().map(like_pattern),
            text_matches_tags: filter.text_matches_tags,
            captured_from: filter.captured_from,
            captured_to: filter.captured_to,
            tags: filter.tags.clone(),
            collection_id: filter.collection_id,
        }
    }
}

/// Bind `$1`..`$12` in the order [`PREDICATE`] expects.
fn bind_predicate<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    b: &'q PredicateBinds,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    query
        .bind(&b.levels)
        .bind(b.owner_id)
        .bind(b.kind)
        .bind(b.category_id)
        .bind(b.section_id)
        .bind(b.access_level)
        .bind(b.text_pattern.as_deref())
        .bind(b.text_matches_tags)
        .bind(b.captured_from)
        .bind(b.captured_to)
        .bind(&b.tags)
        .bind(b.collection_id)
}

pub struct CatalogRepo;

impl CatalogRepo {
    /// One page of visible assets matching `filter`, plus the total number
    /// of matching rows before paging.
    ///
    /// `filter.access_level` is applied as given; callers narrow it by role
    /// beforehand.
    pub async fn list(
        pool: &PgPool,
        scope: &VisibilityScope,
        filter: &CatalogFilter,
        page: PageRequest,
    ) -> Result<(Vec<CatalogEntry>, i64), sqlx::Error> {
        let binds = PredicateBinds::new(scope, filter);

        let count_sql = format!("SELECT COUNT(*) FROM assets a WHERE {PREDICATE}");
        let (total,): (i64,) = bind_predicate(sqlx::query_as::<_, (i64,)>(&count_sql), &binds)
            .fetch_one(pool)
            .await?;

        let rows_sql = format!("{ENTRY_SELECT} WHERE {PREDICATE} {ORDER} LIMIT $13 OFFSET $14");
        let items = bind_predicate(sqlx::query_as::<_, CatalogEntry>(&rows_sql), &binds)
            .bind(page.page_size)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok((items, total))
    }

    /// Unpaged search capped at `limit` rows.
    pub async fn search(
        pool: &PgPool,
        scope: &VisibilityScope,
        filter: &CatalogFilter,
        limit: i64,
    ) -> Result<Vec<CatalogEntry>, sqlx::Error> {
        let binds = PredicateBinds::new(scope, filter);
        let sql = format!("{ENTRY_SELECT} WHERE {PREDICATE} {ORDER} LIMIT $13");
        bind_predicate(sqlx::query_as::<_, CatalogEntry>(&sql), &binds)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Single catalog entry regardless of visibility; the caller checks
    /// access on the returned row.
    pub async fn find_entry(pool: &PgPool, id: DbId) -> Result<Option<CatalogEntry>, sqlx::Error> {
        let sql = format!("{ENTRY_SELECT} WHERE a.id = $1");
        sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
