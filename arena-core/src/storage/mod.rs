//! Object storage for uploaded images.

pub mod http;
pub mod image;
pub mod keys;
pub mod local;

use std::sync::Arc;

use arena_config::{StorageBackend, StorageConfig};
use arena_model::UploadResponse;
use async_trait::async_trait;
use tracing::info;

use crate::error::{ArenaError, Result};

pub use self::image::{ImageKind, ImageUpload};
pub use http::HttpObjectStorage;
pub use keys::ObjectKey;
pub use local::LocalObjectStorage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: ObjectKey,
    pub url: String,
}

#[cfg_attr(any(test, feature = "test-support"), mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `key`, replacing any existing object.
    async fn put(
        &self,
        key: &ObjectKey,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject>;

    /// Returns `false` when nothing was stored under `key`.
    async fn delete(&self, key: &ObjectKey) -> Result<bool>;

    fn public_url(&self, key: &ObjectKey) -> String;

    fn backend(&self) -> StorageBackend;
}

/// Build the backend selected in configuration.
pub fn from_config(config: &StorageConfig) -> Result<Arc<dyn ObjectStorage>> {
    match config.backend {
        StorageBackend::Local => Ok(Arc::new(LocalObjectStorage::new(
            config.local_root.clone(),
            config.public_base_url.clone(),
        ))),
        StorageBackend::Http => {
            let missing = |field: &str| {
                ArenaError::Storage(format!("remote storage requires {field}"))
            };
            let endpoint = config.endpoint.clone().ok_or_else(|| missing("an endpoint"))?;
            let bucket = config.bucket.clone().ok_or_else(|| missing("a bucket"))?;
            let api_key = config.api_key.clone().ok_or_else(|| missing("an API key"))?;
            Ok(Arc::new(HttpObjectStorage::new(endpoint, bucket, api_key)?))
        }
    }
}

/// Validate an image body and store it under a fresh dated key.
pub async fn store_image(
    storage: &dyn ObjectStorage,
    folder: Option<&str>,
    bytes: Vec<u8>,
) -> Result<UploadResponse> {
    let upload = ImageUpload::inspect(&bytes)?;
    let key = ObjectKey::for_upload(folder, upload.kind)?;
    let stored = storage
        .put(&key, bytes, upload.kind.content_type())
        .await?;

    info!(
        key = %stored.key,
        size = upload.size,
        width = upload.width,
        height = upload.height,
        "stored uploaded image"
    );
    Ok(UploadResponse {
        key: stored.key.to_string(),
        url: stored.url,
        content_type: upload.kind.content_type().to_string(),
        size: upload.size,
        width: upload.width,
        height: upload.height,
        checksum: upload.checksum,
    })
}
