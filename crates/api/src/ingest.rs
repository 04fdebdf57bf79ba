//! Media ingestion: multipart parsing, validation, binary storage and the
//! transactional catalog write.
//!
//! Every form value is validated before the binary touches disk. Once the
//! binary is stored, a failed database write removes it again.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::Multipart;
use chrono::Utc;
use serde::Serialize;

use mediateca_core::access::AccessLevel;
use mediateca_core::association::{parse_ids, parse_names};
use mediateca_core::catalog::{normalize_text, parse_date, parse_id};
use mediateca_core::error::CoreError;
use mediateca_core::media::{
    extension_of, is_allowed_mime, random_suffix, resolve_kind, sha256_hex, storage_subdir,
    stored_file_name,
};
use mediateca_core::types::DbId;
use mediateca_db::models::asset::{AssetAssociations, CreateAsset};
use mediateca_db::repositories::AssetRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Name of the multipart field carrying the binary.
pub const FILE_FIELD: &str = "file";

const DEFAULT_MIME: &str = "application/octet-stream";

/// The binary part of an upload.
#[derive(Debug)]
pub struct UploadedFile {
    pub original_name: String,
    pub mime_type: String,
    pub data: Bytes,
}

/// A fully read multipart upload.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    /// Drain a multipart body. Only the first `file` part is kept; an empty
    /// file part without a name (a browser's "no file chosen") counts as
    /// absent.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == FILE_FIELD {
                let original_name = field.file_name().unwrap_or_default().to_string();
                let mime_type = field.content_type().unwrap_or(DEFAULT_MIME).to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;

                if original_name.is_empty() && data.is_empty() {
                    continue;
                }
                if form.file.is_some() {
                    tracing::debug!("Ignoring extra file part");
                    continue;
                }
                form.file = Some(UploadedFile {
                    original_name,
                    mime_type,
                    data,
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Trimmed, non-blank text field.
    fn text(&self, name: &str) -> Option<String> {
        normalize_text(self.fields.get(name).map(String::as_str))
    }

    fn raw(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Body of `201 Created` after an upload.
#[derive(Debug, Serialize)]
pub struct IngestOutcome {
    pub id: DbId,
    pub stored_name: String,
    /// Storage path relative to the media root.
    pub path: String,
}

/// Validate an upload, store its binary and write the catalog record with
/// all associations.
pub async fn ingest(state: &AppState, owner_id: DbId, form: UploadForm) -> AppResult<IngestOutcome> {
    let Some(file) = form.file.as_ref() else {
        return Err(AppError::BadRequest("No file provided".into()));
    };

    if !is_allowed_mime(&file.mime_type) {
        return Err(AppError::BadRequest(format!(
            "File type '{}' is not allowed",
            file.mime_type
        )));
    }

    let kind = resolve_kind(form.raw("kind"), &file.mime_type)?;
    let access_level = match form.text("access_level") {
        Some(raw) => raw.parse::<AccessLevel>()?,
        None => AccessLevel::default(),
    };
    let category_id = parse_id("category_id", form.raw("category_id"))?;
    let captured_on = parse_date("captured_on", form.raw("captured_on"))?;
    let links = AssetAssociations {
        tags: form
            .raw("tags")
            .map(|raw| parse_names(raw).into_vec())
            .unwrap_or_default(),
        collection_ids: parse_id_list("collections", form.raw("collections"))?,
        section_ids: parse_id_list("sections", form.raw("sections"))?,
    };

    let now = Utc::now();
    let stored_name = stored_file_name(&file.original_name, now, random_suffix());
    let checksum = sha256_hex(&file.data);
    let path = state
        .store
        .save(&storage_subdir(kind, now), &stored_name, &file.data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;

    let input = CreateAsset {
        original_name: file.original_name.clone(),
        stored_name: stored_name.clone(),
        storage_path: path.clone(),
        title: form
            .text("title")
            .unwrap_or_else(|| file.original_name.clone()),
        description: form.text("description"),
        kind,
        mime_type: file.mime_type.clone(),
        size_bytes: file.data.len() as i64,
        extension: extension_of(&file.original_name),
        checksum_sha256: checksum,
        access_level,
        owner_id,
        category_id,
        source: form.text("source"),
        capture_place: form.text("capture_place"),
        captured_on,
        usage_rights: form.text("usage_rights"),
    };

    let asset = match AssetRepo::create_with_associations(&state.pool, &input, &links).await {
        Ok(asset) => asset,
        Err(e) => {
            state.store.remove_quietly(&path).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        asset_id = asset.id,
        user_id = owner_id,
        kind = %kind,
        size_bytes = asset.size_bytes,
        tags = links.tags.len(),
        "Asset ingested",
    );

    Ok(IngestOutcome {
        id: asset.id,
        stored_name,
        path,
    })
}

fn parse_id_list(field: &str, raw: Option<&str>) -> Result<Vec<DbId>, CoreError> {
    match raw {
        Some(raw) => Ok(parse_ids(field, raw)?.into_vec()),
        None => Ok(Vec::new()),
    }
}
