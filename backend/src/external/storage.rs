//! Media storage for uploaded images
//!
//! Clients send images as base64 data URIs. They are decoded and written
//! under the media directory, which the HTTP layer serves statically.

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::{AppError, AppResult};
use shared::parse_image_data_uri;

/// Maximum decoded image size
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFolder {
    Avatars,
    Community,
    Diagnosis,
}

impl MediaFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFolder::Avatars => "avatars",
            MediaFolder::Community => "community",
            MediaFolder::Diagnosis => "diagnosis",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaStorage {
    media_dir: PathBuf,
    public_base_url: String,
}

impl MediaStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self::with_root(PathBuf::from(&config.media_dir), config.public_base_url.clone())
    }

    pub fn with_root(media_dir: PathBuf, public_base_url: String) -> Self {
        Self {
            media_dir,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn media_dir(&self) -> &PathBuf {
        &self.media_dir
    }

    /// Decode a data URI, store it and return its public URL
    pub async fn save_data_uri(&self, folder: MediaFolder, data_uri: &str) -> AppResult<String> {
        let (mime, payload) = parse_image_data_uri(data_uri).map_err(|msg| {
            AppError::invalid_field("image", msg, "चित्र का प्रारूप मान्य नहीं है")
        })?;

        let bytes = STANDARD.decode(payload.trim()).map_err(|_| {
            AppError::invalid_field(
                "image",
                "Image data is not valid base64",
                "चित्र का डेटा मान्य नहीं है",
            )
        })?;

        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::invalid_field(
                "image",
                "Image is larger than 5 MB",
                "चित्र 5 MB से बड़ा है",
            ));
        }

        let file_name = format!("{}.{}", Uuid::new_v4(), extension_for(mime));
        let dir = self.media_dir.join(folder.as_str());

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::StorageError(format!("Failed to create {}: {}", dir.display(), e)))?;
        tokio::fs::write(dir.join(&file_name), &bytes)
            .await
            .map_err(|e| AppError::StorageError(format!("Failed to write {}: {}", file_name, e)))?;

        tracing::debug!("Stored {} bytes as {}/{}", bytes.len(), folder.as_str(), file_name);

        Ok(format!("{}/{}/{}", self.public_base_url, folder.as_str(), file_name))
    }
}

fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/heic" => "heic",
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> MediaStorage {
        let root = std::env::temp_dir().join(format!("km-media-{}", Uuid::new_v4()));
        MediaStorage::with_root(root, "http://localhost:3000/media/".into())
    }

    #[tokio::test]
    async fn test_save_writes_file_and_returns_url() {
        let storage = storage();
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(b"not really a png"));

        let url = storage.save_data_uri(MediaFolder::Community, &uri).await.unwrap();

        assert!(url.starts_with("http://localhost:3000/media/community/"));
        assert!(url.ends_with(".png"));
        let name = url.rsplit('/').next().unwrap();
        let stored = std::fs::read(storage.media_dir().join("community").join(name)).unwrap();
        assert_eq!(stored, b"not really a png");

        std::fs::remove_dir_all(storage.media_dir()).ok();
    }

    #[tokio::test]
    async fn test_rejects_bad_payloads() {
        let storage = storage();
        let not_base64 = storage
            .save_data_uri(MediaFolder::Avatars, "data:image/jpeg;base64,@@@")
            .await;
        assert!(matches!(not_base64, Err(AppError::Validation { .. })));

        let wrong_type = storage
            .save_data_uri(MediaFolder::Avatars, "data:text/plain;base64,aGk=")
            .await;
        assert!(matches!(wrong_type, Err(AppError::Validation { .. })));
    }
}
