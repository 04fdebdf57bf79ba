//! Catalog filtering and pagination helpers.
//!
//! Query-string values arrive as raw strings. Paging values are coerced
//! (anything malformed falls back to the default); filter values are
//! validated and rejected with [`CoreError::Validation`].

use chrono::NaiveDate;
use serde::Serialize;

use crate::access::AccessLevel;
use crate::error::CoreError;
use crate::media::MediaKind;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

pub const DEFAULT_PAGE: i64 = 1;

/// Default number of assets per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum number of assets per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Hard cap on rows returned by the free-text search endpoint.
pub const SEARCH_RESULT_CAP: i64 = 50;

/// A normalized, 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Coerce raw `page` / `limit` query values.
    ///
    /// Absent, non-numeric, zero or negative values take the defaults; the
    /// page size is capped at [`MAX_PAGE_SIZE`].
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let positive = |raw: Option<&str>| {
            raw.and_then(|s| s.trim().parse::<i64>().ok())
                .filter(|n| *n > 0)
        };
        Self {
            page: positive(page).unwrap_or(DEFAULT_PAGE),
            page_size: positive(limit)
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .min(MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// Pagination block returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PageInfo {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let total = total.max(0);
        Self {
            page: request.page,
            page_size: request.page_size,
            total,
            total_pages: (total + request.page_size - 1) / request.page_size,
        }
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// AND-combined catalog filters. `None` / empty means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub kind: Option<MediaKind>,
    pub category_id: Option<DbId>,
    pub section_id: Option<DbId>,
    pub collection_id: Option<DbId>,
    /// Only honoured for administrators; see
    /// [`effective_access_filter`](crate::access::effective_access_filter).
    pub access_level: Option<AccessLevel>,
    /// Case-insensitive substring over title, description and original name.
    pub text: Option<String>,
    /// Extend the text match to tag names (search endpoint).
    pub text_matches_tags: bool,
    pub captured_from: Option<NaiveDate>,
    pub captured_to: Option<NaiveDate>,
    /// The asset must carry at least one of these tags.
    pub tags: Vec<String>,
}

/// Trim a free-text value; blank becomes `None`.
pub fn normalize_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// The search endpoint requires a non-blank `q`.
pub fn require_search_query(raw: Option<&str>) -> Result<String, CoreError> {
    normalize_text(raw)
        .ok_or_else(|| CoreError::Validation("Missing required query parameter 'q'".to_string()))
}

/// Parse an optional `YYYY-MM-DD` value; blank is treated as absent.
pub fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, CoreError> {
    match normalize_text(raw) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                CoreError::Validation(format!("Invalid date '{s}' for '{field}', expected YYYY-MM-DD"))
            }),
    }
}

/// Parse an optional numeric id; blank is treated as absent.
pub fn parse_id(field: &str, raw: Option<&str>) -> Result<Option<DbId>, CoreError> {
    match normalize_text(raw) {
        None => Ok(None),
        Some(s) => s
            .parse::<DbId>()
            .map(Some)
            .map_err(|_| CoreError::Validation(format!("Invalid id '{s}' for '{field}'"))),
    }
}

/// Wrap text in `%...%` for `ILIKE`, escaping the pattern metacharacters.
pub fn like_pattern(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}
