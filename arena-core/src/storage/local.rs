use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use arena_config::StorageBackend;
use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use super::{ObjectKey, ObjectStorage, StoredObject};
use crate::error::Result;

/// Stores objects as files under `root`; the server exposes them under
/// `public_base_url`.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: PathBuf, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self {
            root,
            public_base_url,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &ObjectKey) -> PathBuf {
        key.as_str()
            .split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn put(
        &self,
        key: &ObjectKey,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write beside the target and rename so readers never see a partial file.
        let staging = path.with_extension(format!("{}.part", Uuid::new_v4().simple()));
        fs::write(&staging, &bytes).await?;
        if let Err(err) = fs::rename(&staging, &path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(err.into());
        }

        info!(%key, content_type, size = bytes.len(), "stored object on disk");
        Ok(StoredObject {
            key: key.clone(),
            url: self.public_url(key),
        })
    }

    async fn delete(&self, key: &ObjectKey) -> Result<bool> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => {
                info!(%key, "deleted object from disk");
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(%key, "object already absent");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn public_url(&self, key: &ObjectKey) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
