//! Local preview rendering for staged uploads.
//!
//! Decodes an image, shrinks it to fit [`PREVIEW_MAX_EDGE`], and re-encodes
//! it as a PNG `data:` URL that any image view can display directly.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use bytes::Bytes;
use image::ImageFormat;
use std::io::Cursor;
use thiserror::Error;

/// Longest edge of a rendered preview, in pixels.
pub const PREVIEW_MAX_EDGE: u32 = 512;

#[derive(Debug, Error)]
pub enum PreviewError {
    /// Only `image/*` payloads can be previewed.
    #[error("no preview available for {0}")]
    Unsupported(String),

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode preview: {0}")]
    Encode(#[source] image::ImageError),

    #[error("preview task failed: {0}")]
    Task(String),
}

/// A rendered preview ready for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preview {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

/// Renders a preview synchronously. CPU-bound; prefer
/// [`render_preview_async`] from async code.
pub fn render_preview(bytes: &[u8], mime: &str) -> Result<Preview, PreviewError> {
    if !mime.trim().to_ascii_lowercase().starts_with("image/") {
        return Err(PreviewError::Unsupported(mime.to_string()));
    }

    let decoded = image::load_from_memory(bytes).map_err(PreviewError::Decode)?;
    let resized = if decoded.width() > PREVIEW_MAX_EDGE || decoded.height() > PREVIEW_MAX_EDGE {
        decoded.thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE)
    } else {
        decoded
    };

    let mut encoded = Vec::new();
    resized
        .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
        .map_err(PreviewError::Encode)?;

    Ok(Preview {
        data_url: format!("data:image/png;base64,{}", BASE64_STANDARD.encode(&encoded)),
        width: resized.width(),
        height: resized.height(),
    })
}

/// Renders a preview on the blocking pool so decoding never stalls the
/// event loop.
pub async fn render_preview_async(bytes: Bytes, mime: String) -> Result<Preview, PreviewError> {
    tokio::task::spawn_blocking(move || render_preview(&bytes, &mime))
        .await
        .map_err(|e| PreviewError::Task(e.to_string()))?
}
