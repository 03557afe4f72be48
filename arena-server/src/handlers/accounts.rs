use axum::{Extension, Json, extract::State, http::StatusCode};
use arena_model::{
    ApiResponse, AuthResponse, LoginRequest, RegisterRequest, UpdateRoleRequest, User,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::infra::app_state::AppState;
use crate::infra::errors::AppResult;
use crate::infra::extract::{ApiJson, ApiPath};

pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let response = state.accounts.register(&request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    Ok(Json(ApiResponse::success(state.accounts.login(&request).await?)))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<ApiResponse<User>>> {
    Ok(Json(ApiResponse::success(state.accounts.me(user.id).await?)))
}

pub async fn list_users(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<User>>>> {
    Ok(Json(ApiResponse::success(state.accounts.list_users().await?)))
}

pub async fn set_role(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    ApiPath(target): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateRoleRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = state
        .accounts
        .set_role(admin.id, target, request.role)
        .await?;
    Ok(Json(ApiResponse::success(user)))
}
