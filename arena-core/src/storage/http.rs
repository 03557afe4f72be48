use std::time::Duration;

use arena_config::StorageBackend;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use tracing::{info, warn};

use super::{ObjectKey, ObjectStorage, StoredObject};
use crate::error::{ArenaError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const ERROR_BODY_LIMIT: usize = 512;

/// Client for a Supabase-compatible storage REST API.
#[derive(Clone)]
pub struct HttpObjectStorage {
    client: Client,
    endpoint: String,
    bucket: String,
    api_key: String,
}

impl std::fmt::Debug for HttpObjectStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpObjectStorage")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl HttpObjectStorage {
    pub fn new(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ArenaError::Storage(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            api_key: api_key.into(),
        })
    }

    fn object_url(&self, key: &ObjectKey) -> String {
        format!("{}/object/{}/{}", self.endpoint, self.bucket, key)
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    if body.len() <= ERROR_BODY_LIMIT {
        return body.to_string();
    }
    let mut end = ERROR_BODY_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn put(
        &self,
        key: &ObjectKey,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject> {
        let size = bytes.len();
        let response = self
            .client
            .post(self.object_url(key))
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await
            .map_err(|e| ArenaError::Storage(format!("upload request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%key, %status, "object storage rejected upload");
            return Err(ArenaError::Storage(format!(
                "upload failed with {status}: {}",
                truncate_body(&body)
            )));
        }

        info!(%key, content_type, size, bucket = %self.bucket, "stored object remotely");
        Ok(StoredObject {
            key: key.clone(),
            url: self.public_url(key),
        })
    }

    async fn delete(&self, key: &ObjectKey) -> Result<bool> {
        let response = self
            .client
            .delete(self.object_url(key))
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| ArenaError::Storage(format!("delete request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ArenaError::Storage(format!(
                "delete failed with {status}: {}",
                truncate_body(&body)
            )));
        }

        info!(%key, bucket = %self.bucket, "deleted remote object");
        Ok(true)
    }

    fn public_url(&self, key: &ObjectKey) -> String {
        format!("{}/object/public/{}/{}", self.endpoint, self.bucket, key)
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Http
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Bytes,
        extract::{Path, State},
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::post,
    };
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorded {
        uploads: Arc<Mutex<Vec<(String, String, String, usize)>>>,
    }

    async fn upload(
        State(recorded): State<Recorded>,
        Path((bucket, key)): Path<(String, String)>,
        headers: HeaderMap,
        body: Bytes,
    ) -> AxumStatus {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        recorded
            .uploads
            .lock()
            .unwrap()
            .push((bucket, key, auth, body.len()));
        AxumStatus::OK
    }

    async fn remove(Path((_bucket, key)): Path<(String, String)>) -> AxumStatus {
        if key.ends_with("missing.png") {
            AxumStatus::NOT_FOUND
        } else {
            AxumStatus::OK
        }
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/storage/v1")
    }

    #[tokio::test]
    async fn uploads_and_deletes_through_rest_api() {
        let recorded = Recorded::default();
        let router = Router::new()
            .route(
                "/storage/v1/object/{bucket}/{*key}",
                post(upload).delete(remove),
            )
            .with_state(recorded.clone());
        let endpoint = serve(router).await;

        let storage = HttpObjectStorage::new(&endpoint, "arena", "service-key").unwrap();
        let key = ObjectKey::parse("hoteles/2026/02/h.webp").unwrap();

        let stored = storage.put(&key, vec![0; 32], "image/webp").await.unwrap();
        assert_eq!(
            stored.url,
            format!("{endpoint}/object/public/arena/hoteles/2026/02/h.webp")
        );

        let uploads = recorded.uploads.lock().unwrap().clone();
        assert_eq!(
            uploads,
            vec![(
                "arena".to_string(),
                "hoteles/2026/02/h.webp".to_string(),
                "Bearer service-key".to_string(),
                32
            )]
        );

        assert!(storage.delete(&key).await.unwrap());
        let missing = ObjectKey::parse("hoteles/missing.png").unwrap();
        assert!(!storage.delete(&missing).await.unwrap());
    }

    #[tokio::test]
    async fn surfaces_rejections_as_storage_errors() {
        let router = Router::new().route(
            "/storage/v1/object/{bucket}/{*key}",
            post(|| async { (AxumStatus::FORBIDDEN, "bucket policy denies write") }),
        );
        let endpoint = serve(router).await;

        let storage = HttpObjectStorage::new(endpoint, "arena", "bad-key").unwrap();
        let key = ObjectKey::parse("general/x.png").unwrap();
        let err = storage.put(&key, vec![1], "image/png").await.unwrap_err();
        assert!(
            matches!(&err, ArenaError::Storage(msg) if msg.contains("403") && msg.contains("policy")),
            "{err}"
        );
    }

    #[test]
    fn truncates_long_bodies_on_char_boundaries() {
        let body = "é".repeat(400);
        let truncated = truncate_body(&body);
        assert!(truncated.len() <= ERROR_BODY_LIMIT + '…'.len_utf8());
        assert!(truncated.ends_with('…'));
    }
}
