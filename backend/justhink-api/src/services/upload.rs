//! Image upload
//!
//! Uploaded images are decoded, scaled down to at most 512 px in height,
//! re-encoded as JPEG and stored as public objects.
//!
//! Decoding and resizing run on the blocking pool.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageOutputFormat};
use regex::Regex;
use s3_utils::S3Operations;
use std::io::Cursor;
use std::sync::{Arc, LazyLock};

use crate::error::{AppError, Result};

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const MAX_HEIGHT: u32 = 512;
const JPEG_QUALITY: u8 = 90;
const CONTENT_TYPE: &str = "image/jpeg";

static KEY_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s+=.:-]").expect("Invalid object key regex"));

/// Destination for processed uploads
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` publicly under `key` and return its URL
    async fn put_public(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String>;
}

#[async_trait]
impl ObjectStore for S3Operations {
    async fn put_public(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String> {
        Ok(self.upload_public(key, body, content_type).await?)
    }
}

/// Object key for an upload named `filename` at `now`
pub fn object_key(filename: &str, now: DateTime<Utc>) -> String {
    let raw = format!(
        "{}{}",
        filename,
        now.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    format!("{}.jpeg", KEY_STRIP.replace_all(&raw, ""))
}

/// Target size keeping the aspect ratio, or `None` when no resize is needed
fn scaled_dimensions(width: u32, height: u32) -> Option<(u32, u32)> {
    if height <= MAX_HEIGHT {
        return None;
    }
    let ratio = MAX_HEIGHT as f64 / height as f64;
    let new_width = ((width as f64) * ratio).round() as u32;
    Some((new_width.max(1), MAX_HEIGHT))
}

/// Decode, downscale if taller than 512 px, and encode as JPEG
pub fn process_image(data: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(data)
        .map_err(|_| AppError::Validation("Invalid image".to_string()))?;

    let (width, height) = img.dimensions();
    let img = match scaled_dimensions(width, height) {
        Some((w, h)) => img.resize_exact(w, h, FilterType::Lanczos3),
        None => img,
    };

    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Jpeg(JPEG_QUALITY))
        .map_err(|e| AppError::Internal(format!("Failed to encode JPEG: {e}")))?;

    tracing::debug!(
        original_width = width,
        original_height = height,
        size = buf.len(),
        "image processed"
    );
    Ok(buf)
}

#[derive(Clone)]
pub struct UploadService {
    store: Arc<dyn ObjectStore>,
}

impl UploadService {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Process and store an uploaded image, returning its public URL
    pub async fn upload(&self, filename: &str, data: Vec<u8>) -> Result<String> {
        if data.is_empty() {
            return Err(AppError::Validation("Image not provided".to_string()));
        }
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::Validation("Image is too large".to_string()));
        }

        let jpeg = tokio::task::spawn_blocking(move || process_image(&data))
            .await
            .map_err(|e| AppError::Internal(format!("Image task panicked: {e}")))??;

        let key = object_key(filename, Utc::now());
        let url = self.store.put_public(&key, jpeg, CONTENT_TYPE).await?;

        tracing::info!(key = %key, "image uploaded");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use image::{ImageBuffer, Rgb};
    use tokio::sync::Mutex;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgb([200u8, 40, 40]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    #[derive(Default)]
    struct MemoryStore {
        objects: Mutex<Vec<(String, Vec<u8>, String)>>,
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        async fn put_public(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String> {
            self.objects
                .lock()
                .await
                .push((key.to_string(), body, content_type.to_string()));
            Ok(format!("https://cdn.test/{key}"))
        }
    }

    #[test]
    fn test_object_key_strips_separators() {
        let now = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(
            object_key("my photo.v2+final=1", now),
            "myphotov2final120210304T050607Z.jpeg"
        );
    }

    #[test]
    fn test_tall_image_scaled_to_max_height() {
        let jpeg = process_image(&png(400, 1024)).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();

        assert_eq!(decoded.dimensions(), (200, 512));
    }

    #[test]
    fn test_short_image_kept() {
        let jpeg = process_image(&png(300, 200)).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();

        assert_eq!(decoded.dimensions(), (300, 200));
        assert_eq!(
            image::guess_format(&jpeg).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_garbage_rejected() {
        let err = process_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid image"));
    }

    #[tokio::test]
    async fn test_upload_stores_jpeg() {
        let store = Arc::new(MemoryStore::default());
        let service = UploadService::new(store.clone());

        let url = service.upload("avatar.png", png(10, 10)).await.unwrap();

        let objects = store.objects.lock().await;
        assert_eq!(objects.len(), 1);
        let (key, _, content_type) = &objects[0];
        assert!(key.starts_with("avatarpng"));
        assert!(key.ends_with(".jpeg"));
        assert_eq!(content_type, "image/jpeg");
        assert_eq!(url, format!("https://cdn.test/{key}"));
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected() {
        let service = UploadService::new(Arc::new(MemoryStore::default()));
        let err = service
            .upload("big", vec![0u8; MAX_UPLOAD_BYTES + 1])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }
}
