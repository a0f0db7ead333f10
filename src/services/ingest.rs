//! Image ingestion: validate, encode, measure and place uploaded files.
//!
//! DESIGN
//! ======
//! Each file is checked against the accepted MIME types and the size cap,
//! read, encoded as a data URL and decoded on a blocking task to learn its
//! natural dimensions. The image is then placed at a random spot in the
//! `100..300` band, scaled down to at most 400 units wide.
//!
//! Decoding finishes asynchronously, so every result checks a [`Liveness`]
//! flag before it is committed. Once the owning view is torn down, late
//! results are dropped without touching the store.
//!
//! ERROR HANDLING
//! ==============
//! Files are independent: a rejected or unreadable file is reported in its
//! own [`IngestOutcome`] and the rest of the batch continues.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use canvas::doc::{ImageItem, ItemId, new_id};
use canvas::camera::Point;
use canvas::geom::{Rect, snap_point};
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ErrorCode;
use crate::services::board::{BoardError, Command};
use crate::state::AppState;

#[cfg(test)]
#[path = "ingest_test.rs"]
mod ingest_test;

/// MIME types accepted for upload.
pub const ACCEPTED_TYPES: [&str; 5] = ["image/jpeg", "image/jpg", "image/png", "image/gif", "image/webp"];

/// Widest initial placement, in canvas units.
const PLACEMENT_MAX_WIDTH: f64 = 400.0;
/// Left/top edge of the random placement band.
const PLACEMENT_ORIGIN: f64 = 100.0;
/// Width of the random placement band.
const PLACEMENT_SPREAD: f64 = 200.0;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("{name}: unsupported file type {mime}")]
    UnsupportedType { name: String, mime: String },
    #[error("{name}: file is {size} bytes, the limit is {max}")]
    TooLarge { name: String, size: u64, max: u64 },
    #[error("{name}: read failed: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{name}: not a decodable image: {message}")]
    Decode { name: String, message: String },
    #[error(transparent)]
    Store(#[from] BoardError),
}

impl ErrorCode for IngestError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedType { .. } => "E_UPLOAD_TYPE",
            Self::TooLarge { .. } => "E_UPLOAD_TOO_LARGE",
            Self::Read { .. } => "E_UPLOAD_READ",
            Self::Decode { .. } => "E_UPLOAD_DECODE",
            Self::Store(e) => e.error_code(),
        }
    }
}

/// Result of ingesting one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum IngestOutcome {
    Added { file: String, id: ItemId, width: f64, height: f64 },
    Failed { file: String, code: &'static str, message: String },
    /// Finished after the view was torn down; nothing was committed.
    Dropped { file: String },
}

/// Shared "still mounted" flag checked before committing async results.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Default for Liveness {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl Liveness {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Mark the owner as gone. Every clone observes it.
    pub fn tear_down(&self) {
        self.0.store(false, Ordering::Release);
    }
}

// =============================================================================
// PURE HELPERS
// =============================================================================

/// MIME type implied by a file extension, if it is one we know.
#[must_use]
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Check type and size before reading the file.
///
/// # Errors
///
/// Returns [`IngestError::UnsupportedType`] or [`IngestError::TooLarge`].
pub fn validate(name: &str, mime: &str, size: u64, max: u64) -> Result<(), IngestError> {
    let mime = mime.to_ascii_lowercase();
    if !ACCEPTED_TYPES.contains(&mime.as_str()) {
        return Err(IngestError::UnsupportedType { name: name.to_owned(), mime });
    }
    if size > max {
        return Err(IngestError::TooLarge { name: name.to_owned(), size, max });
    }
    Ok(())
}

#[must_use]
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Natural pixel dimensions, read from the image header.
///
/// # Errors
///
/// Returns [`IngestError::Decode`] when the bytes are not a supported image.
pub fn decode_dimensions(name: &str, bytes: &[u8]) -> Result<(u32, u32), IngestError> {
    let decode_err = |message: String| IngestError::Decode { name: name.to_owned(), message };
    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| decode_err(e.to_string()))?
        .into_dimensions()
        .map_err(|e| decode_err(e.to_string()))?;
    if width == 0 || height == 0 {
        return Err(decode_err("zero-sized image".to_owned()));
    }
    Ok((width, height))
}

/// Initial placement for an image of the given natural size.
///
/// With `grid` set the top-left corner lands on the grid; the size keeps the
/// image's aspect ratio and is not snapped.
pub fn placement<R: Rng + ?Sized>(natural_width: u32, natural_height: u32, grid: Option<f64>, rng: &mut R) -> Rect {
    let (w, h) = (f64::from(natural_width), f64::from(natural_height));
    let scale = (PLACEMENT_MAX_WIDTH / w).min(1.0);
    let origin = Point::new(
        PLACEMENT_ORIGIN + rng.random::<f64>() * PLACEMENT_SPREAD,
        PLACEMENT_ORIGIN + rng.random::<f64>() * PLACEMENT_SPREAD,
    );
    let origin = grid.map_or(origin, |g| snap_point(origin, g));
    Rect::new(origin.x, origin.y, w * scale, h * scale)
}

// =============================================================================
// FILE INGESTION
// =============================================================================

/// Read, validate and measure one file into a new [`ImageItem`].
///
/// # Errors
///
/// Returns [`IngestError`] for rejected, unreadable or undecodable files.
pub async fn load_image(path: &Path, max_bytes: u64, grid: Option<f64>) -> Result<ImageItem, IngestError> {
    let name = path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let read_err = |source| IngestError::Read { name: name.clone(), source };

    let mime = mime_for_path(path).unwrap_or("application/octet-stream");
    let size = tokio::fs::metadata(path).await.map_err(read_err)?.len();
    validate(&name, mime, size, max_bytes)?;
    let bytes = tokio::fs::read(path).await.map_err(read_err)?;

    let decode_name = name.clone();
    let (bytes, dims) = tokio::task::spawn_blocking(move || {
        let dims = decode_dimensions(&decode_name, &bytes);
        (bytes, dims)
    })
    .await
    .map_err(|e| IngestError::Decode { name: name.clone(), message: e.to_string() })?;
    let (natural_w, natural_h) = dims?;

    let rect = placement(natural_w, natural_h, grid, &mut rand::rng());
    Ok(ImageItem {
        id: new_id("img"),
        src: to_data_url(mime, &bytes),
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
        rotation: 0.0,
    })
}

/// Ingest `paths` onto `board_id`, one outcome per file, in order.
pub async fn ingest_files(state: &AppState, board_id: &str, paths: &[PathBuf], liveness: &Liveness) -> Vec<IngestOutcome> {
    let mut outcomes = Vec::with_capacity(paths.len());
    for path in paths {
        let file = path.display().to_string();
        let loaded = load_image(path, state.config.max_upload_bytes, state.config.snap_grid()).await;
        if !liveness.is_alive() {
            info!(%file, "ingest finished after teardown; dropping result");
            outcomes.push(IngestOutcome::Dropped { file });
            continue;
        }
        let outcome = match loaded {
            Ok(image) => commit(state, board_id, file, image).await,
            Err(e) => failed(file, &e),
        };
        outcomes.push(outcome);
    }
    outcomes
}

async fn commit(state: &AppState, board_id: &str, file: String, image: ImageItem) -> IngestOutcome {
    let (id, width, height) = (image.id.clone(), image.width, image.height);
    match state.apply(Command::AddImage { board_id: board_id.to_owned(), image }).await {
        Ok(_) => {
            info!(%file, image_id = %id, board_id, "image added");
            IngestOutcome::Added { file, id, width, height }
        }
        Err(e) => failed(file, &IngestError::from(e)),
    }
}

fn failed(file: String, err: &IngestError) -> IngestOutcome {
    warn!(%file, error = %err, "image rejected");
    IngestOutcome::Failed { file, code: err.error_code(), message: err.to_string() }
}
