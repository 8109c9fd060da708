//! Article image download for inline embedding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::models::ImageSlot;

/// Shown in place of an image that could not be loaded.
pub const IMAGE_UNAVAILABLE: &str = "Image could not be loaded.";

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image server answered {0}")]
    Status(reqwest::StatusCode),

    #[error("not an image (content-type: {0})")]
    NotAnImage(String),

    #[error("empty image body")]
    Empty,
}

/// Image type from the leading bytes, for servers that do not label it.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, ..] => Some("image/png"),
        [0xff, 0xd8, 0xff, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [b'B', b'M', ..] => Some("image/bmp"),
        _ => None,
    }
}

fn is_unlabeled(mime_type: &str) -> bool {
    matches!(
        mime_type,
        "" | "application/octet-stream" | "binary/octet-stream"
    )
}

/// Downloaded image bytes with their MIME type.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl InlineImage {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// Download `url` and check that it really is an image.
///
/// A missing or generic binary content type falls back to sniffing the
/// first bytes.
///
/// # Errors
///
/// Any transport failure, a non-2xx status, a non-image body or an empty
/// body.
#[instrument(level = "debug", skip(client))]
pub async fn fetch_image(client: &Client, url: &str) -> Result<InlineImage, ImageError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ImageError::Status(status));
    }

    let mime_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_ascii_lowercase())
        .unwrap_or_default();
    if !mime_type.starts_with("image/") && !is_unlabeled(&mime_type) {
        return Err(ImageError::NotAnImage(mime_type));
    }

    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }
    let mime_type = if is_unlabeled(&mime_type) {
        match sniff_image_mime(&bytes) {
            Some(sniffed) => sniffed.to_string(),
            None => return Err(ImageError::NotAnImage(mime_type)),
        }
    } else {
        mime_type
    };
    debug!(bytes = bytes.len(), %mime_type, "Fetched image");
    Ok(InlineImage {
        mime_type,
        bytes: bytes.to_vec(),
    })
}

/// Resolve what to display for an article's image.
pub async fn image_slot(client: &Client, image_url: Option<&str>) -> ImageSlot {
    let Some(url) = image_url else {
        return ImageSlot::None;
    };
    match fetch_image(client, url).await {
        Ok(image) => ImageSlot::Inline {
            data_uri: image.data_uri(),
        },
        Err(e) => {
            warn!(%url, error = %e, "Image could not be loaded");
            ImageSlot::Unavailable {
                notice: IMAGE_UNAVAILABLE.to_string(),
            }
        }
    }
}
