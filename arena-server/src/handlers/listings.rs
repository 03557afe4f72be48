use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use arena_core::catalog::{Listing, ListingQuery};
use arena_model::{ApiResponse, Page};
use serde_json::Value;

use super::{LangQuery, entity};
use crate::infra::app_state::AppState;
use crate::infra::errors::AppResult;
use crate::infra::extract::{ApiJson, ApiPath, ApiQuery};

pub async fn list_public(
    State(state): State<AppState>,
    ApiPath(entity_name): ApiPath<String>,
    ApiQuery(query): ApiQuery<ListingQuery>,
    ApiQuery(lang): ApiQuery<LangQuery>,
) -> AppResult<Json<ApiResponse<Page<Listing>>>> {
    let kind = entity(&entity_name)?;
    let page = state
        .listings
        .list_public(kind, query, lang.locale()?)
        .await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn get_public(
    State(state): State<AppState>,
    ApiPath((entity_name, id)): ApiPath<(String, i64)>,
    ApiQuery(lang): ApiQuery<LangQuery>,
) -> AppResult<Json<ApiResponse<Listing>>> {
    let kind = entity(&entity_name)?;
    let listing = state.listings.get_public(kind, id, lang.locale()?).await?;
    Ok(Json(ApiResponse::success(listing)))
}

pub async fn list_admin(
    State(state): State<AppState>,
    ApiPath(entity_name): ApiPath<String>,
    ApiQuery(query): ApiQuery<ListingQuery>,
) -> AppResult<Json<ApiResponse<Page<Listing>>>> {
    let kind = entity(&entity_name)?;
    let page = state.listings.list_admin(kind, &query).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn get_admin(
    State(state): State<AppState>,
    ApiPath((entity_name, id)): ApiPath<(String, i64)>,
) -> AppResult<Json<ApiResponse<Listing>>> {
    let kind = entity(&entity_name)?;
    Ok(Json(ApiResponse::success(state.listings.get_admin(kind, id).await?)))
}

pub async fn create(
    State(state): State<AppState>,
    ApiPath(entity_name): ApiPath<String>,
    ApiJson(payload): ApiJson<Value>,
) -> AppResult<(StatusCode, Json<ApiResponse<Listing>>)> {
    let kind = entity(&entity_name)?;
    let listing = state.listings.create(kind, &payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(listing))))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath((entity_name, id)): ApiPath<(String, i64)>,
    ApiJson(payload): ApiJson<Value>,
) -> AppResult<Json<ApiResponse<Listing>>> {
    let kind = entity(&entity_name)?;
    let listing = state.listings.update(kind, id, &payload).await?;
    Ok(Json(ApiResponse::success(listing)))
}

pub async fn delete(
    State(state): State<AppState>,
    ApiPath((entity_name, id)): ApiPath<(String, i64)>,
) -> AppResult<StatusCode> {
    let kind = entity(&entity_name)?;
    state.listings.delete(kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
