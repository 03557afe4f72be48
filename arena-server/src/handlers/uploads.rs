use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
};
use arena_core::storage::{self, ObjectKey, ObjectStorage};
use arena_model::{ApiResponse, UploadResponse};
use serde::Deserialize;
use tracing::{debug, info};

use crate::infra::app_state::AppState;
use crate::infra::errors::{AppError, AppResult};
use crate::infra::extract::{ApiPath, ApiQuery};

#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    /// Entity table name or `general`.
    pub folder: Option<String>,
}

/// Store the raw request body as an image.
pub async fn upload(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UploadQuery>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<UploadResponse>>)> {
    let body = body.map_err(|rejection| AppError::new(rejection.status(), rejection.body_text()))?;
    let limit = state.config().storage.max_upload_bytes;

    if body.is_empty() {
        return Err(AppError::bad_request("upload body is empty"));
    }
    if body.len() > limit {
        return Err(AppError::payload_too_large(format!(
            "upload exceeds the {limit} byte limit"
        )));
    }

    let stored =
        storage::store_image(state.storage.as_ref(), query.folder.as_deref(), body.to_vec())
            .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(stored))))
}

/// Idempotent: deleting a missing object also answers 204.
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(raw_key): ApiPath<String>,
) -> AppResult<StatusCode> {
    let key = ObjectKey::parse(&raw_key)?;
    if state.storage.delete(&key).await? {
        info!(key = %key, "Deleted upload");
    } else {
        debug!(key = %key, "Upload already absent");
    }
    Ok(StatusCode::NO_CONTENT)
}
