use serde::{Deserialize, Serialize};

/// Result of a successful image upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResponse {
    /// Object key inside the bucket, e.g. `restaurantes/2026/10/<uuid>.jpg`.
    pub key: String,
    /// Publicly reachable URL for the stored object.
    pub url: String,
    pub content_type: String,
    pub size: u64,
    pub width: u32,
    pub height: u32,
    /// Hex-encoded SHA-256 of the uploaded bytes.
    pub checksum: String,
}
