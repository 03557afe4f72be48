use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::infra::app_state::AppState;
use crate::infra::errors::AppError;

/// Identity taken from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;
    let claims = state
        .tokens()
        .verify(token)
        .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

    request.extensions_mut().insert(AuthUser {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    });
    Ok(next.run(request).await)
}

/// Must run after [`auth_middleware`].
pub async fn admin_middleware(request: Request, next: Next) -> Response {
    match request.extensions().get::<AuthUser>() {
        None => AppError::unauthorized("Authentication required").into_response(),
        Some(user) if !user.is_admin() => {
            AppError::forbidden("Admin access required").into_response()
        }
        Some(_) => next.run(request).await,
    }
}

fn extract_bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
