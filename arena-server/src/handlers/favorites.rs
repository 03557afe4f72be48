use axum::{Extension, Json, extract::State, http::StatusCode};
use arena_model::{ApiResponse, Favorite, FavoriteRequest, FavoriteStatus};
use serde::Deserialize;

use super::LangQuery;
use crate::auth::AuthUser;
use crate::infra::app_state::AppState;
use crate::infra::errors::AppResult;
use crate::infra::extract::{ApiJson, ApiPath, ApiQuery};

#[derive(Debug, Default, Deserialize)]
pub struct FavoritesQuery {
    pub item_type: Option<String>,
    #[serde(default)]
    pub expand: bool,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiQuery(query): ApiQuery<FavoritesQuery>,
    ApiQuery(lang): ApiQuery<LangQuery>,
) -> AppResult<Json<ApiResponse<Vec<Favorite>>>> {
    let favorites = state
        .favorites
        .list(
            user.id,
            query.item_type.as_deref(),
            query.expand,
            lang.locale()?,
        )
        .await?;
    Ok(Json(ApiResponse::success(favorites)))
}

/// `201` when the favorite was created, `200` when it already existed.
pub async fn add(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(request): ApiJson<FavoriteRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Favorite>>)> {
    let (favorite, created) = state.favorites.add(user.id, &request).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ApiResponse::success(favorite))))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath((item_type, item_id)): ApiPath<(String, i64)>,
) -> AppResult<StatusCode> {
    state.favorites.remove(user.id, &item_type, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath((item_type, item_id)): ApiPath<(String, i64)>,
) -> AppResult<Json<ApiResponse<FavoriteStatus>>> {
    let status = state.favorites.status(user.id, &item_type, item_id).await?;
    Ok(Json(ApiResponse::success(status)))
}

pub async fn toggle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(request): ApiJson<FavoriteRequest>,
) -> AppResult<Json<ApiResponse<FavoriteStatus>>> {
    let status = state.favorites.toggle(user.id, &request).await?;
    Ok(Json(ApiResponse::success(status)))
}
