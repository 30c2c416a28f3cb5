//! Upload validation and local preview decoding.
//!
//! A selection is accepted only when its declared MIME type is one of the
//! common web image types and its size is within the configured ceiling.
//! Accepted files are decoded into a `data:` URL preview; the header is
//! sniffed for pixel dimensions so that a corrupt or mislabelled file is
//! caught before it is ever submitted.

use std::io::Cursor;
use std::path::Path;

use base64::Engine;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";
pub const MIME_GIF: &str = "image/gif";
pub const MIME_WEBP: &str = "image/webp";

/// Declared type for files whose extension is not recognised.
pub const MIME_UNKNOWN: &str = "application/octet-stream";

/// Declared MIME types accepted for upload.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[MIME_JPEG, MIME_PNG, MIME_GIF, MIME_WEBP];

/// Default upload ceiling (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The file currently chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSelection {
    pub file_name: String,
    /// MIME type as declared by the picker, not sniffed from content.
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadSelection {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Build a selection from a file on disk, deriving the declared type
    /// from its extension.
    pub async fn from_path(path: &Path) -> Result<Self, CoreError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CoreError::Validation(format!("Cannot read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, mime_for_path(path), bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Limits applied to every selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_bytes: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// A decoded, displayable preview of an accepted selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

// ---------------------------------------------------------------------------
// MIME helpers
// ---------------------------------------------------------------------------

/// Map a file extension (case-insensitive, without the dot) to a MIME type.
pub fn mime_from_extension(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => MIME_JPEG,
        "png" => MIME_PNG,
        "gif" => MIME_GIF,
        "webp" => MIME_WEBP,
        _ => MIME_UNKNOWN,
    }
}

pub fn mime_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(mime_from_extension)
        .unwrap_or(MIME_UNKNOWN)
}

pub fn is_allowed_image_type(mime_type: &str) -> bool {
    let normalized = mime_type.trim().to_lowercase();
    ALLOWED_IMAGE_TYPES.contains(&normalized.as_str())
}

// ---------------------------------------------------------------------------
// Validation and decoding
// ---------------------------------------------------------------------------

/// Check the declared type and size of a selection.
///
/// A file exactly at the ceiling is accepted.
pub fn validate_selection(
    selection: &UploadSelection,
    limits: &UploadLimits,
) -> Result<(), CoreError> {
    if !is_allowed_image_type(&selection.mime_type) {
        return Err(CoreError::Validation(
            "Please select an image file (JPEG, PNG, GIF or WebP)".to_string(),
        ));
    }

    if selection.size() > limits.max_bytes {
        return Err(CoreError::Validation(format!(
            "File is too large ({:.1} MB). Maximum size is {:.0} MB",
            selection.size() as f64 / BYTES_PER_MIB,
            limits.max_bytes as f64 / BYTES_PER_MIB,
        )));
    }

    Ok(())
}

/// Sniff the image header and encode the bytes as a `data:` URL.
pub fn decode_preview(selection: &UploadSelection) -> Result<ImagePreview, CoreError> {
    let reader = image::ImageReader::new(Cursor::new(selection.bytes.as_slice()))
        .with_guessed_format()
        .map_err(|e| CoreError::Decode(e.to_string()))?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| CoreError::Decode(e.to_string()))?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(&selection.bytes);
    let data_url = format!(
        "data:{};base64,{encoded}",
        selection.mime_type.trim().to_lowercase()
    );

    Ok(ImagePreview {
        data_url,
        width,
        height,
    })
}

/// Validate and decode a selection off the async executor.
///
/// The selection is handed back alongside its preview so the caller can
/// keep it as the active upload.
pub async fn prepare_preview(
    selection: UploadSelection,
    limits: UploadLimits,
) -> Result<(UploadSelection, ImagePreview), CoreError> {
    validate_selection(&selection, &limits)?;

    tokio::task::spawn_blocking(move || {
        let preview = decode_preview(&selection)?;
        Ok((selection, preview))
    })
    .await
    .map_err(|e| CoreError::Internal(format!("Preview task failed: {e}")))?
}
