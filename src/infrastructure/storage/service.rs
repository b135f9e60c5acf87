//! Image store trait and error types.

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

use crate::error::AppError;

/// An image file received in a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Errors raised while storing uploads.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unsupported content type: {0}")]
    UnsupportedType(String),
    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },
    #[error("empty file")]
    Empty,
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to name file: {0}")]
    Naming(String),
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::UnsupportedType(ct) => AppError::bad_request(
                "Only image uploads are accepted",
                json!({ "content_type": ct }),
            ),
            StorageError::TooLarge { size, limit } => AppError::bad_request(
                "Image is too large",
                json!({ "size": size, "limit": limit }),
            ),
            StorageError::Empty => AppError::bad_request("Image file is empty", json!({})),
            other => {
                tracing::error!(error = %other, "Failed to store upload");
                AppError::internal("Failed to store image", json!({}))
            }
        }
    }
}

/// Trait for persisting uploaded images and returning their public URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Stores `image` and returns the URL under which it is served.
    async fn store(&self, image: UploadedImage) -> Result<String, StorageError>;
}
