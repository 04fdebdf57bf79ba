//! Handlers for the `/assets` resource: catalog listing, upload, detail,
//! metadata edits, deletion and download.
//!
//! Reads apply the row-visibility rule for the caller's role. Edits and
//! deletes are limited to the owner or an administrator.

use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use mediateca_core::access::{can_view, AccessLevel, VisibilityScope};
use mediateca_core::association::{parse_names, AssociationList};
use mediateca_core::catalog::{normalize_text, parse_date, PageInfo};
use mediateca_core::error::CoreError;
use mediateca_core::roles::can_modify;
use mediateca_core::types::DbId;
use mediateca_db::models::asset::{Asset, CatalogEntry, UpdateAsset};
use mediateca_db::repositories::{AssetRepo, CatalogRepo};

use crate::error::{AppError, AppResult};
use crate::ingest::{ingest, IngestOutcome, UploadForm};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireContributor};
use crate::query::ListAssetsParams;
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Tags in an edit body: a JSON array, or a string in any shape the upload
/// form accepts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Raw(String),
}

impl TagsInput {
    fn into_names(self) -> Vec<String> {
        match self {
            TagsInput::List(items) => AssociationList::Explicit(
                items
                    .into_iter()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect(),
            )
            .into_vec(),
            TagsInput::Raw(raw) => parse_names(&raw).into_vec(),
        }
    }
}

/// Request body for `PUT /assets/{id}`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAssetRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub access_level: Option<String>,
    pub source: Option<String>,
    pub capture_place: Option<String>,
    pub captured_on: Option<String>,
    pub usage_rights: Option<String>,
    /// Replaces the whole tag set when present.
    pub tags: Option<TagsInput>,
}

impl UpdateAssetRequest {
    fn into_update(self) -> Result<UpdateAsset, CoreError> {
        let access_level = normalize_text(self.access_level.as_deref())
            .map(|s| s.parse::<AccessLevel>())
            .transpose()?;

        Ok(UpdateAsset {
            title: normalize_text(self.title.as_deref()),
            description: self.description,
            category_id: self.category_id,
            access_level,
            source: self.source,
            capture_place: self.capture_place,
            captured_on: parse_date("captured_on", self.captured_on.as_deref())?,
            usage_rights: self.usage_rights,
            tags: self.tags.map(TagsInput::into_names),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn stored_access(value: &str) -> AppResult<AccessLevel> {
    value
        .parse()
        .map_err(|_| AppError::InternalError(format!("Stored access level '{value}' is invalid")))
}

fn hidden(id: DbId) -> AppError {
    AppError::Core(CoreError::Forbidden(format!(
        "You do not have access to asset {id}"
    )))
}

/// Load an asset and check the caller may modify it.
async fn load_for_modification(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Asset> {
    let asset = AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))?;

    if !can_modify(user.role, user.user_id, asset.owner_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owner or an administrator may modify this asset".into(),
        )));
    }
    Ok(asset)
}

/// `Content-Disposition` value; characters unsafe inside a quoted header
/// parameter are replaced.
fn attachment_disposition(original_name: &str) -> String {
    let safe: String = original_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/assets
///
/// One page of the catalog as visible to the caller.
pub async fn list_assets(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ListAssetsParams>,
) -> AppResult<Json<PagedResponse<CatalogEntry>>> {
    let filter = params.to_filter(user.role)?;
    let page = params.page_request();
    let scope = VisibilityScope::for_caller(user.role, user.user_id);

    let (items, total) = CatalogRepo::list(&state.pool, &scope, &filter, page).await?;

    Ok(Json(PagedResponse {
        data: items,
        pagination: PageInfo::new(page, total),
    }))
}

/// POST /api/v1/assets
///
/// Multipart upload. See [`crate::ingest`].
pub async fn create_asset(
    State(state): State<AppState>,
    RequireContributor(user): RequireContributor,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<IngestOutcome>)> {
    let form = UploadForm::read(multipart).await?;
    let outcome = ingest(&state, user.user_id, form).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// GET /api/v1/assets/{id}
///
/// Asset detail with association names. Counts a view.
pub async fn get_asset(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CatalogEntry>>> {
    let mut entry = CatalogRepo::find_entry(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))?;

    let access = stored_access(&entry.access_level)?;
    if !can_view(user.role, user.user_id, access, entry.owner_id) {
        return Err(hidden(id));
    }

    if AssetRepo::increment_view_count(&state.pool, id).await? {
        entry.view_count += 1;
    }

    Ok(Json(DataResponse { data: entry }))
}

/// PUT /api/v1/assets/{id}
///
/// Partial metadata edit; `tags` replaces the tag set.
pub async fn update_asset(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAssetRequest>,
) -> AppResult<Json<DataResponse<CatalogEntry>>> {
    load_for_modification(&state, &user, id).await?;

    let update = input.into_update()?;
    AssetRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))?;

    let entry = CatalogRepo::find_entry(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))?;

    tracing::info!(asset_id = id, user_id = user.user_id, "Asset metadata updated");
    Ok(Json(DataResponse { data: entry }))
}

/// DELETE /api/v1/assets/{id}
///
/// Removes the catalog row (associations cascade), then the stored binary.
pub async fn delete_asset(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_for_modification(&state, &user, id).await?;

    let deleted = AssetRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))?;

    state.store.remove_quietly(&deleted.storage_path).await;

    tracing::info!(asset_id = id, user_id = user.user_id, "Asset deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/assets/{id}/download
///
/// Streams the stored binary as an attachment and counts the download.
/// The counter only moves once the binary is known to exist.
pub async fn download_asset(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let asset = AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))?;

    let access = stored_access(&asset.access_level)?;
    if !can_view(user.role, user.user_id, access, asset.owner_id) {
        return Err(hidden(id));
    }

    let (file, len) = match state.store.open(&asset.storage_path).await {
        Ok(opened) => opened,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::Core(CoreError::StorageMissing { id }));
        }
        Err(e) => return Err(AppError::InternalError(format!("Failed to open stored file: {e}"))),
    };

    let count = AssetRepo::increment_download_count(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))?;
    tracing::info!(asset_id = id, user_id = user.user_id, download_count = count, "Asset downloaded");

    let stream = ReaderStream::new(file);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, asset.mime_type.as_str())
        .header(header::CONTENT_LENGTH, len.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&asset.original_name),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::InternalError(format!("Failed to build download response: {e}")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn disposition_keeps_plain_names() {
        assert_eq!(
            attachment_disposition("report 2024.pdf"),
            "attachment; filename=\"report 2024.pdf\""
        );
    }

    #[test]
    fn disposition_replaces_unsafe_characters() {
        assert_eq!(
            attachment_disposition("a\"b\\c\nd.png"),
            "attachment; filename=\"a_b_c_d.png\""
        );
        assert_eq!(attachment_disposition("año.jpg"), "attachment; filename=\"a_o.jpg\"");
    }

    #[test]
    fn edit_tags_accept_list_or_string() {
        let list: UpdateAssetRequest =
            serde_json::from_str(r#"{"tags": ["a", " b ", "a", ""]}"#).unwrap();
        assert_eq!(list.into_update().unwrap().tags, Some(vec!["a".into(), "b".into()]));

        let raw: UpdateAssetRequest = serde_json::from_str(r#"{"tags": "x, y"}"#).unwrap();
        assert_eq!(raw.into_update().unwrap().tags, Some(vec!["x".into(), "y".into()]));

        let absent: UpdateAssetRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.into_update().unwrap().tags, None);
    }

    #[test]
    fn edit_rejects_bad_access_level_and_date() {
        let bad_level = UpdateAssetRequest {
            access_level: Some("secret".into()),
            ..Default::default()
        };
        assert_matches!(bad_level.into_update(), Err(CoreError::Validation(_)));

        let bad_date = UpdateAssetRequest {
            captured_on: Some("yesterday".into()),
            ..Default::default()
        };
        assert_matches!(bad_date.into_update(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn private_alias_is_accepted_on_edit() {
        let req = UpdateAssetRequest {
            access_level: Some("private".into()),
            ..Default::default()
        };
        assert_eq!(
            req.into_update().unwrap().access_level,
            Some(AccessLevel::Confidential)
        );
    }
}
