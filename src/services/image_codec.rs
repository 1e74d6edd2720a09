//! Inline image decoding
//!
//! Book payloads carry their cover as a data URI
//! (`data:image/png;base64,....`). This module turns such a string into raw
//! bytes plus the file extension to store them under.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// Largest accepted decoded image, in bytes (2 MiB)
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

const ALLOWED_TYPES: [&str; 3] = ["jpeg", "jpg", "png"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("Invalid base64 image data: {0}")]
    MalformedInput(String),
    #[error("Unsupported image type '{0}', expected one of jpeg, jpg, png")]
    UnsupportedImageType(String),
    #[error("Image size exceeds the limit of 2MB ({0} bytes)")]
    PayloadTooLarge(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    /// Lower-cased declared type, used as the stored file extension
    pub extension: String,
}

/// Returns true when `value` looks like an inline image rather than a stored filename.
pub fn is_data_uri(value: &str) -> bool {
    value.starts_with("data:")
}

/// Decode `data:image/<type>;base64,<payload>`.
pub fn decode(data_uri: &str) -> Result<DecodedImage, ImageError> {
    let rest = data_uri
        .strip_prefix("data:image/")
        .ok_or_else(|| ImageError::MalformedInput("expected a data:image/ URI".to_string()))?;

    let (declared, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| ImageError::MalformedInput("expected ;base64, marker".to_string()))?;

    if declared.is_empty()
        || !declared
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ImageError::MalformedInput(format!(
            "invalid image type '{}'",
            declared
        )));
    }

    let extension = declared.to_ascii_lowercase();
    if !ALLOWED_TYPES.contains(&extension.as_str()) {
        return Err(ImageError::UnsupportedImageType(extension));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| ImageError::MalformedInput(e.to_string()))?;

    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ImageError::PayloadTooLarge(bytes.len()));
    }

    Ok(DecodedImage { bytes, extension })
}
