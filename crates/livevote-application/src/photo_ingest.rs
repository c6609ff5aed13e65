//! Photo ingestion: uploaded image bytes to an opaque photo reference.
//!
//! Every upload is decoded, scaled down to the configured width when wider,
//! and re-encoded as JPEG so phone-sized photos fit the local store. The
//! reference is a `data:image/jpeg;base64,...` URI the store keeps verbatim.

use std::io::Cursor;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageError};
use livevote_core::config::IngestConfig;
use livevote_core::error::{LiveVoteError, Result};

/// Turns image files into compressed data URIs.
#[derive(Debug, Clone)]
pub struct PhotoIngestor {
    max_bytes: u64,
    max_width: u32,
    jpeg_quality: u8,
}

impl PhotoIngestor {
    pub fn from_config(config: &IngestConfig) -> Self {
        Self {
            max_bytes: config.max_photo_bytes,
            max_width: config.max_width.max(1),
            jpeg_quality: config.jpeg_quality.clamp(1, 100),
        }
    }

    /// Compresses raw image bytes of the given MIME type.
    ///
    /// The byte limit applies to the upload, before compression.
    pub fn ingest_bytes(&self, bytes: &[u8], mime_type: &str) -> Result<String> {
        if !mime_type.starts_with("image/") {
            return Err(LiveVoteError::ingest(format!("not an image: {}", mime_type)));
        }
        if bytes.is_empty() {
            return Err(LiveVoteError::ingest("empty image"));
        }
        if bytes.len() as u64 > self.max_bytes {
            return Err(LiveVoteError::ingest(format!(
                "image is {} bytes, limit is {}",
                bytes.len(),
                self.max_bytes
            )));
        }

        let image = image::load_from_memory(bytes).map_err(decode_error)?;
        let jpeg = self.compress(&image)?;
        tracing::debug!(
            "Compressed {}x{} {} ({} bytes) to {} bytes",
            image.width(),
            image.height(),
            mime_type,
            bytes.len(),
            jpeg.len()
        );

        Ok(format!(
            "data:image/jpeg;base64,{}",
            BASE64_STANDARD.encode(jpeg)
        ))
    }

    /// Reads and compresses an image file. The extension must name an image type.
    pub fn ingest_file(&self, path: &Path) -> Result<String> {
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string())
            .ok_or_else(|| {
                LiveVoteError::ingest(format!("unknown file type: {}", path.display()))
            })?;

        // Check the size before reading the whole file
        let size = std::fs::metadata(path)?.len();
        if size > self.max_bytes {
            return Err(LiveVoteError::ingest(format!(
                "{} is {} bytes, limit is {}",
                path.display(),
                size,
                self.max_bytes
            )));
        }

        let bytes = std::fs::read(path)?;
        self.ingest_bytes(&bytes, &mime_type)
    }

    fn compress(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let resized;
        let image = if image.width() > self.max_width {
            let height = (u64::from(image.height()) * u64::from(self.max_width)
                / u64::from(image.width()))
            .max(1) as u32;
            resized = image.resize_exact(self.max_width, height, FilterType::Triangle);
            &resized
        } else {
            image
        };

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(Cursor::new(&mut jpeg), self.jpeg_quality)
            .encode_image(&image.to_rgb8())
            .map_err(|e| LiveVoteError::ingest(format!("cannot encode JPEG: {}", e)))?;
        Ok(jpeg)
    }
}

fn decode_error(err: ImageError) -> LiveVoteError {
    LiveVoteError::ingest(format!("cannot decode image: {}", err))
}

impl Default for PhotoIngestor {
    fn default() -> Self {
        Self::from_config(&IngestConfig::default())
    }
}
