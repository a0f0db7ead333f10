//! Export service: board JSON documents and raw image files.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use canvas::doc::{Board, Group, ImageItem, Note, ViewMode};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::error::ErrorCode;

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

/// Format version written into every export.
pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("export io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("export serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ErrorCode for ExportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "E_EXPORT_IO",
            Self::Serialize(_) => "E_EXPORT_SERIALIZE",
        }
    }
}

/// The exported form of one board.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument<'a> {
    pub name: &'a str,
    pub images: &'a [ImageItem],
    pub groups: &'a [Group],
    pub notes: &'a [Note],
    pub view_mode: ViewMode,
    #[serde(with = "time::serde::rfc3339")]
    pub exported_at: OffsetDateTime,
    pub version: &'static str,
}

impl<'a> ExportDocument<'a> {
    #[must_use]
    pub fn new(board: &'a Board, exported_at: OffsetDateTime) -> Self {
        Self {
            name: &board.name,
            images: &board.images,
            groups: &board.groups,
            notes: &board.notes,
            view_mode: board.view_mode,
            exported_at,
            version: EXPORT_VERSION,
        }
    }
}

/// One decoded image ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// `My  Board` exported at `t` → `my-board-<t in unix ms>.json`.
#[must_use]
pub fn export_file_name(name: &str, exported_at: OffsetDateTime) -> String {
    let slug = name.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase();
    let millis = exported_at.unix_timestamp_nanos() / 1_000_000;
    format!("{slug}-{millis}.json")
}

/// Pretty-printed export document with its file name.
///
/// # Errors
///
/// Returns [`ExportError::Serialize`] if serialization fails.
pub fn export_json(board: &Board, exported_at: OffsetDateTime) -> Result<(String, String), ExportError> {
    let json = serde_json::to_string_pretty(&ExportDocument::new(board, exported_at))?;
    Ok((export_file_name(&board.name, exported_at), json))
}

/// Decode every data-URL image of `board`, numbered from 1 in board order.
///
/// Images whose source is not a base64 data URL are skipped with a warning.
#[must_use]
pub fn export_images(board: &Board) -> Vec<ExportedImage> {
    let mut out = Vec::new();
    for (index, image) in board.images.iter().enumerate() {
        let Some((mime, bytes)) = decode_data_url(&image.src) else {
            warn!(image_id = %image.id, "image source is not a data URL; skipped");
            continue;
        };
        out.push(ExportedImage {
            file_name: format!("{}-image-{}.{}", board.name, index + 1, extension_for(&mime)),
            bytes,
        });
    }
    out
}

/// Write the export (and optionally its images) into `dir`. Returns the written paths.
///
/// # Errors
///
/// Returns [`ExportError`] on the first failed write.
pub async fn write_export(
    dir: &Path,
    board: &Board,
    exported_at: OffsetDateTime,
    include_images: bool,
) -> Result<Vec<PathBuf>, ExportError> {
    tokio::fs::create_dir_all(dir).await?;
    let (file_name, json) = export_json(board, exported_at)?;
    let mut written = vec![dir.join(file_name)];
    tokio::fs::write(&written[0], json).await?;

    if include_images {
        for image in export_images(board) {
            let path = dir.join(image.file_name.replace(['/', '\\'], "-"));
            tokio::fs::write(&path, &image.bytes).await?;
            written.push(path);
        }
    }
    info!(board_id = %board.id, files = written.len(), "board exported");
    Ok(written)
}

/// Split `data:<mime>;base64,<payload>` into its MIME type and bytes.
fn decode_data_url(src: &str) -> Option<(String, Vec<u8>)> {
    let rest = src.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some((mime.to_ascii_lowercase(), bytes))
}

fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "png",
    }
}
