//! Photo ingestion: turns an uploaded `data:` URL into an [`ImageRef`].

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::advisor::types::ImageRef;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("expected a data: URL")]
    NotDataUrl,
    #[error("data URL must be base64-encoded")]
    NotBase64,
    #[error("unsupported media type: {0}")]
    UnsupportedMime(String),
    #[error("image data is not valid base64: {0}")]
    InvalidBase64(String),
    #[error("image data is empty")]
    Empty,
}

impl crate::error::ErrorCode for IngestError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotDataUrl | Self::NotBase64 => "E_BAD_DATA_URL",
            Self::UnsupportedMime(_) => "E_UNSUPPORTED_MEDIA",
            Self::InvalidBase64(_) => "E_BAD_IMAGE_DATA",
            Self::Empty => "E_EMPTY_IMAGE",
        }
    }
}

/// Decode `data:<mime>[;params];base64,<payload>`.
///
/// Only `image/*` media types are accepted. Whitespace inside the payload is
/// ignored so line-wrapped encodings decode.
///
/// # Errors
///
/// Returns an [`IngestError`] describing the first problem found.
pub fn decode_data_url(url: &str) -> Result<ImageRef, IngestError> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or(IngestError::NotDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(IngestError::NotDataUrl)?;

    let mut params = header.split(';');
    let mime_type = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(IngestError::NotBase64);
    }
    if !mime_type.starts_with("image/") || mime_type.len() == "image/".len() {
        return Err(IngestError::UnsupportedMime(mime_type));
    }

    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(IngestError::Empty);
    }
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| IngestError::InvalidBase64(e.to_string()))?;
    if bytes.is_empty() {
        return Err(IngestError::Empty);
    }
    Ok(ImageRef::new(mime_type, bytes))
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod tests;
