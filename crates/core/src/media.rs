//! Media kind classification, upload allow-list, and stored-file naming.

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Maximum length of the sanitized original base name kept in stored names.
pub const MAX_BASE_NAME_LEN: usize = 50;

/// MIME types accepted by the upload endpoint.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    // Images
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    // Video
    "video/mp4",
    "video/avi",
    "video/x-msvideo",
    "video/quicktime",
    "video/mov",
    "video/x-ms-wmv",
    "video/webm",
    // Audio
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/x-wav",
    "audio/ogg",
    // Documents
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Coarse media classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Document,
    Other,
}

impl MediaKind {
    pub const ALL: [MediaKind; 5] = [
        MediaKind::Image,
        MediaKind::Video,
        MediaKind::Audio,
        MediaKind::Document,
        MediaKind::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Document => "document",
            MediaKind::Other => "other",
        }
    }

    /// Top-level directory under the storage root.
    pub fn storage_dir(self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Video => "videos",
            MediaKind::Audio => "audio",
            MediaKind::Document => "documents",
            MediaKind::Other => "other",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        MediaKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid media kind '{s}'. Must be one of: image, video, audio, document, other"
                ))
            })
    }
}

/// Strip parameters (`; charset=...`) and lowercase a MIME type.
pub fn essence(mime: &str) -> String {
    mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase()
}

pub fn is_allowed_mime(mime: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&essence(mime).as_str())
}

/// Classify a MIME type into a [`MediaKind`].
pub fn classify_mime(mime: &str) -> MediaKind {
    let mime = essence(mime);
    if mime.starts_with("image/") {
        MediaKind::Image
    } else if mime.starts_with("video/") {
        MediaKind::Video
    } else if mime.starts_with("audio/") {
        MediaKind::Audio
    } else if mime.contains("pdf") || mime.contains("document") {
        MediaKind::Document
    } else {
        MediaKind::Other
    }
}

/// Resolve the kind of an upload. A non-blank caller hint wins over the MIME
/// classification but must itself name a valid kind.
pub fn resolve_kind(hint: Option<&str>, mime: &str) -> Result<MediaKind, CoreError> {
    match hint.map(str::trim).filter(|h| !h.is_empty()) {
        Some(h) => h.parse(),
        None => Ok(classify_mime(mime)),
    }
}

/// Lowercased extension without the leading dot, or an empty string.
pub fn extension_of(filename: &str) -> String {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Replace anything that is not ASCII alphanumeric with `_` and truncate.
pub fn sanitize_base_name(filename: &str) -> String {
    let stem = std::path::Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    let cleaned: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(MAX_BASE_NAME_LEN)
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Build `<base>_<unix-millis>-<suffix>[.<ext>]`.
pub fn stored_file_name(original: &str, now: Timestamp, suffix: u32) -> String {
    let base = sanitize_base_name(original);
    let ext = extension_of(original);
    let millis = now.timestamp_millis();
    if ext.is_empty() {
        format!("{base}_{millis}-{suffix}")
    } else {
        format!("{base}_{millis}-{suffix}.{ext}")
    }
}

/// Random suffix for [`stored_file_name`].
pub fn random_suffix() -> u32 {
    rand::rng().random_range(0..1_000_000_000)
}

/// Relative directory `<kind-dir>/<yyyy>/<mm>` for an upload, `/`-separated
/// so stored paths are identical across platforms.
pub fn storage_subdir(kind: MediaKind, now: Timestamp) -> String {
    format!("{}/{:04}/{:02}", kind.storage_dir(), now.year(), now.month())
}

/// Hex-encoded SHA-256 of a payload.
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}
