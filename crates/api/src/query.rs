//! Query-string parameters for catalog listing and search.
//!
//! Every field is taken as a raw string so that paging values can be coerced
//! rather than rejected, and filter values produce validation errors with
//! the offending field named.

use serde::Deserialize;

use mediateca_core::access::{effective_access_filter, AccessLevel};
use mediateca_core::association::parse_names;
use mediateca_core::catalog::{
    normalize_text, parse_date, parse_id, require_search_query, CatalogFilter, PageRequest,
};
use mediateca_core::error::CoreError;
use mediateca_core::media::MediaKind;
use mediateca_core::roles::Role;

/// `GET /assets` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListAssetsParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub kind: Option<String>,
    pub category_id: Option<String>,
    pub section_id: Option<String>,
    pub collection_id: Option<String>,
    pub access_level: Option<String>,
    pub q: Option<String>,
    pub captured_from: Option<String>,
    pub captured_to: Option<String>,
    /// JSON array, comma-separated list or a single tag name.
    #[serde(alias = "tag")]
    pub tags: Option<String>,
}

impl ListAssetsParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_raw(self.page.as_deref(), self.limit.as_deref())
    }

    /// Build the filter for a caller. An access-level filter from a
    /// non-administrator is validated and then ignored.
    pub fn to_filter(&self, role: Role) -> Result<CatalogFilter, CoreError> {
        let access_level = normalize_text(self.access_level.as_deref())
            .map(|s| s.parse::<AccessLevel>())
            .transpose()?;

        Ok(CatalogFilter {
            kind: parse_kind(self.kind.as_deref())?,
            category_id: parse_id("category_id", self.category_id.as_deref())?,
            section_id: parse_id("section_id", self.section_id.as_deref())?,
            collection_id: parse_id("collection_id", self.collection_id.as_deref())?,
            access_level: effective_access_filter(role, access_level),
            text: normalize_text(self.q.as_deref()),
            text_matches_tags: false,
            captured_from: parse_date("captured_from", self.captured_from.as_deref())?,
            captured_to: parse_date("captured_to", self.captured_to.as_deref())?,
            tags: self
                .tags
                .as_deref()
                .map(|raw| parse_names(raw).into_vec())
                .unwrap_or_default(),
        })
    }
}

/// `GET /search` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub kind: Option<String>,
    pub category_id: Option<String>,
}

impl SearchParams {
    pub fn to_filter(&self) -> Result<CatalogFilter, CoreError> {
        Ok(CatalogFilter {
            text: Some(require_search_query(self.q.as_deref())?),
            text_matches_tags: true,
            kind: parse_kind(self.kind.as_deref())?,
            category_id: parse_id("category_id", self.category_id.as_deref())?,
            ..CatalogFilter::default()
        })
    }
}

fn parse_kind(raw: Option<&str>) -> Result<Option<MediaKind>, CoreError> {
    normalize_text(raw).map(|s| s.parse()).transpose()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn empty_params_give_empty_filter() {
        let params = ListAssetsParams::default();
        assert_eq!(params.to_filter(Role::Viewer).unwrap(), CatalogFilter::default());
        assert_eq!(params.page_request(), PageRequest::default());
    }

    #[test]
    fn list_params_parse_every_filter() {
        let params = ListAssetsParams {
            kind: Some("video".into()),
            category_id: Some("3".into()),
            captured_from: Some("2024-01-01".into()),
            captured_to: Some("2024-01-31".into()),
            tags: Some("politics, local".into()),
            q: Some("  mayor ".into()),
            ..Default::default()
        };
        let filter = params.to_filter(Role::Journalist).unwrap();
        assert_eq!(filter.kind, Some(MediaKind::Video));
        assert_eq!(filter.category_id, Some(3));
        assert_eq!(filter.captured_from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filter.captured_to, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(filter.tags, vec!["politics", "local"]);
        assert_eq!(filter.text.as_deref(), Some("mayor"));
        assert!(!filter.text_matches_tags);
    }

    #[test]
    fn access_filter_only_for_administrators() {
        let params = ListAssetsParams {
            access_level: Some("confidential".into()),
            ..Default::default()
        };
        assert_eq!(
            params.to_filter(Role::Administrator).unwrap().access_level,
            Some(AccessLevel::Confidential)
        );
        assert_eq!(params.to_filter(Role::Journalist).unwrap().access_level, None);
    }

    #[test]
    fn invalid_filter_values_are_rejected() {
        let bad_kind = ListAssetsParams {
            kind: Some("hologram".into()),
            ..Default::default()
        };
        assert_matches!(bad_kind.to_filter(Role::Viewer), Err(CoreError::Validation(_)));

        let bad_access = ListAssetsParams {
            access_level: Some("secret".into()),
            ..Default::default()
        };
        assert_matches!(bad_access.to_filter(Role::Viewer), Err(CoreError::Validation(_)));
    }

    #[test]
    fn search_requires_q_and_matches_tags() {
        assert_matches!(SearchParams::default().to_filter(), Err(CoreError::Validation(_)));

        let filter = SearchParams {
            q: Some("flood".into()),
            kind: Some("image".into()),
            category_id: None,
        }
        .to_filter()
        .unwrap();
        assert_eq!(filter.text.as_deref(), Some("flood"));
        assert!(filter.text_matches_tags);
        assert_eq!(filter.kind, Some(MediaKind::Image));
    }
}
