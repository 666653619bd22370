//! Resolves an image source to its intrinsic pixel size.
//!
//! Only the image header is decoded. Sources may be `data:` URLs, `http(s)`
//! URLs (with the `remote` feature) or local file paths.

use crate::error::{GalleryError, GalleryResult};
use crate::fit::ImageDimensions;
use base64::{engine::general_purpose, Engine as _};
use image::ImageReader;
use std::io::Cursor;
use std::time::Duration;

/// Probes `source` and fails with a `Render` error if no answer arrives
/// within `timeout`
pub async fn probe_dimensions(source: &str, timeout: Duration) -> GalleryResult<ImageDimensions> {
    match tokio::time::timeout(timeout, probe_unbounded(source)).await {
        Ok(result) => result,
        Err(_) => Err(GalleryError::Render(format!(
            "Timed out after {:?} loading {}",
            timeout, source
        ))),
    }
}

/// Remote probes stop reading after this many bytes
const MAX_REMOTE_HEADER_BYTES: usize = 4 * 1024 * 1024;

async fn probe_unbounded(source: &str) -> GalleryResult<ImageDimensions> {
    let source = source.trim();
    if source.starts_with("http://") || source.starts_with("https://") {
        return probe_remote(source).await;
    }
    let bytes = load_bytes(source).await?;
    dimensions_from_bytes(&bytes)
}

/// Accumulates a streamed body until its image header decodes
struct HeaderBuffer {
    bytes: Vec<u8>,
    limit: usize,
}

impl HeaderBuffer {
    fn new(limit: usize) -> Self {
        Self {
            bytes: Vec::new(),
            limit,
        }
    }

    /// Returns the dimensions as soon as the buffered prefix is enough
    fn push(&mut self, chunk: &[u8]) -> GalleryResult<Option<ImageDimensions>> {
        self.bytes.extend_from_slice(chunk);
        if let Ok(dims) = dimensions_from_bytes(&self.bytes) {
            return Ok(Some(dims));
        }
        if self.bytes.len() >= self.limit {
            return Err(GalleryError::Render(format!(
                "No image header within the first {} bytes",
                self.limit
            )));
        }
        Ok(None)
    }

    fn finish(self) -> GalleryResult<ImageDimensions> {
        dimensions_from_bytes(&self.bytes)
    }
}

/// Reads the pixel size from encoded image bytes
pub fn dimensions_from_bytes(bytes: &[u8]) -> GalleryResult<ImageDimensions> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| GalleryError::Render(format!("Unreadable image: {}", e)))?
        .into_dimensions()
        .map_err(|e| GalleryError::Render(format!("Failed to decode image: {}", e)))?;

    if width == 0 || height == 0 {
        return Err(GalleryError::Render("Image has no pixels".to_string()));
    }
    Ok(ImageDimensions::new(width, height))
}

async fn load_bytes(source: &str) -> GalleryResult<Vec<u8>> {
    let source = source.trim();
    if source.is_empty() {
        return Err(GalleryError::Render("Empty image source".to_string()));
    }

    if let Some(data) = source.strip_prefix("data:") {
        return decode_data_url(data);
    }

    let path = source.strip_prefix("file://").unwrap_or(source);
    tokio::fs::read(path)
        .await
        .map_err(|e| GalleryError::Render(format!("Failed to read {}: {}", path, e)))
}

/// Decodes the part of a data URL after `data:`
fn decode_data_url(data: &str) -> GalleryResult<Vec<u8>> {
    let (meta, payload) = data
        .split_once(',')
        .ok_or_else(|| GalleryError::Render("Malformed data URL".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(GalleryError::Render(
            "Only base64 data URLs are supported".to_string(),
        ));
    }
    general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| GalleryError::Render(format!("Invalid base64 image data: {}", e)))
}

#[cfg(feature = "remote")]
fn http_client() -> &'static reqwest::Client {
    static CLIENT: std::sync::OnceLock<reqwest::Client> = std::sync::OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .user_agent("Folio/0.1.0")
            .build()
            .unwrap_or_default()
    })
}

#[cfg(feature = "remote")]
async fn probe_remote(url: &str) -> GalleryResult<ImageDimensions> {
    let mut response = http_client()
        .get(url)
        .send()
        .await
        .map_err(|e| GalleryError::Render(format!("Failed to fetch {}: {}", url, e)))?;
    if !response.status().is_success() {
        return Err(GalleryError::Render(format!(
            "Fetching {} returned {}",
            url,
            response.status()
        )));
    }

    let mut buffer = HeaderBuffer::new(MAX_REMOTE_HEADER_BYTES);
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| GalleryError::Render(format!("Failed to read {}: {}", url, e)))?
    {
        if let Some(dims) = buffer.push(&chunk)? {
            return Ok(dims);
        }
    }
    buffer.finish()
}

#[cfg(not(feature = "remote"))]
async fn probe_remote(url: &str) -> GalleryResult<ImageDimensions> {
    Err(GalleryError::Render(format!(
        "Remote images are not supported in this build: {}",
        url
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::new(width, height);
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_dimensions_from_png() {
        let dims = dimensions_from_bytes(&png_bytes(40, 30)).unwrap();
        assert_eq!(dims, ImageDimensions::new(40, 30));
    }

    #[test]
    fn test_garbage_is_render_error() {
        let result = dimensions_from_bytes(b"definitely not an image");
        assert!(matches!(result, Err(GalleryError::Render(_))));
    }

    #[test]
    fn test_header_found_before_body_ends() {
        let png = png_bytes(64, 48);
        let mut buffer = HeaderBuffer::new(MAX_REMOTE_HEADER_BYTES);
        let mut found = None;
        for chunk in png.chunks(8) {
            if let Some(dims) = buffer.push(chunk).unwrap() {
                found = Some(dims);
                break;
            }
        }
        assert_eq!(found, Some(ImageDimensions::new(64, 48)));
        assert!(buffer.bytes.len() <= png.len());
    }

    #[test]
    fn test_header_buffer_stops_at_limit() {
        let mut buffer = HeaderBuffer::new(16 * 1024);
        let mut outcome = Ok(None);
        for _ in 0..64 {
            outcome = buffer.push(&[0u8; 1024]);
            if !matches!(outcome, Ok(None)) {
                break;
            }
        }
        assert!(matches!(outcome, Err(GalleryError::Render(_))));
        assert_eq!(buffer.bytes.len(), 16 * 1024);
    }

    #[test]
    fn test_truncated_body_is_render_error() {
        let png = png_bytes(10, 10);
        let mut buffer = HeaderBuffer::new(MAX_REMOTE_HEADER_BYTES);
        assert!(matches!(buffer.push(&png[..4]), Ok(None)));
        assert!(matches!(buffer.finish(), Err(GalleryError::Render(_))));
    }

    #[tokio::test]
    async fn test_probe_data_url() {
        let encoded = general_purpose::STANDARD.encode(png_bytes(12, 7));
        let source = format!("data:image/png;base64,{}", encoded);
        let dims = probe_dimensions(&source, Duration::from_secs(5)).await.unwrap();
        assert_eq!(dims, ImageDimensions::new(12, 7));
    }

    #[tokio::test]
    async fn test_probe_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.png");
        std::fs::write(&path, png_bytes(5, 9)).unwrap();

        let dims = probe_dimensions(&path.to_string_lossy(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(dims, ImageDimensions::new(5, 9));
    }

    #[tokio::test]
    async fn test_probe_missing_source() {
        assert!(probe_dimensions("", Duration::from_secs(1)).await.is_err());
        assert!(probe_dimensions("/no/such/file.jpg", Duration::from_secs(1))
            .await
            .is_err());
        assert!(probe_dimensions("data:image/png,raw", Duration::from_secs(1))
            .await
            .is_err());
    }
}
