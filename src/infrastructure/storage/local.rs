//! Filesystem-backed image store.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

use super::service::{ImageStore, StorageError, UploadedImage};
use crate::utils::random::random_token;

/// Writes uploads into a directory served statically at `base_url`.
pub struct LocalImageStore {
    dir: PathBuf,
    base_url: String,
    max_bytes: usize,
}

impl LocalImageStore {
    /// Creates the upload directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub async fn new(
        dir: impl Into<PathBuf>,
        base_url: &str,
        max_bytes: usize,
    ) -> Result<Self, StorageError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        info!("Storing uploads in {}", dir.display());

        Ok(Self {
            dir,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_bytes,
        })
    }

    /// Extension for an accepted image type. The client's file name is never
    /// consulted, so `ServeDir` only ever serves these four types.
    fn extension(content_type: &str) -> Option<&'static str> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "image/jpeg" | "image/jpg" => Some("jpg"),
            "image/png" => Some("png"),
            "image/gif" => Some("gif"),
            "image/webp" => Some("webp"),
            _ => None,
        }
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, image: UploadedImage) -> Result<String, StorageError> {
        let content_type = image.content_type.clone().unwrap_or_default();
        let Some(extension) = Self::extension(&content_type) else {
            return Err(StorageError::UnsupportedType(content_type));
        };
        if image.bytes.is_empty() {
            return Err(StorageError::Empty);
        }
        if image.bytes.len() > self.max_bytes {
            return Err(StorageError::TooLarge {
                size: image.bytes.len(),
                limit: self.max_bytes,
            });
        }

        let stem = random_token(16).map_err(|e| StorageError::Naming(e.to_string()))?;
        let file_name = format!("{stem}.{extension}");

        tokio::fs::write(self.dir.join(&file_name), &image.bytes).await?;
        debug!(file = %file_name, size = image.bytes.len(), "Stored upload");

        Ok(format!("{}/{}", self.base_url, file_name))
    }
}
