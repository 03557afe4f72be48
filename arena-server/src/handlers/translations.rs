use axum::{Json, extract::State};
use arena_core::translation::TranslationScope;
use arena_model::{ApiResponse, BackfillSummary, TranslationOutcome};
use serde::Deserialize;

use super::entity;
use crate::infra::app_state::AppState;
use crate::infra::errors::{AppError, AppResult};
use crate::infra::extract::{ApiPath, ApiQuery};

pub const DEFAULT_BACKFILL_LIMIT: u32 = 20;
pub const MAX_BACKFILL_LIMIT: u32 = 200;

#[derive(Debug, Default, Deserialize)]
pub struct TranslateQuery {
    /// Overwrite existing translations instead of filling gaps only.
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct BackfillQuery {
    pub limit: Option<u32>,
}

impl BackfillQuery {
    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_BACKFILL_LIMIT)
            .clamp(1, MAX_BACKFILL_LIMIT)
    }
}

fn ensure_enabled(state: &AppState) -> AppResult<()> {
    if state.translator().is_enabled() {
        Ok(())
    } else {
        Err(AppError::service_unavailable("Translation is not configured"))
    }
}

pub async fn translate_listing(
    State(state): State<AppState>,
    ApiPath((entity_name, id)): ApiPath<(String, i64)>,
    ApiQuery(query): ApiQuery<TranslateQuery>,
) -> AppResult<Json<ApiResponse<TranslationOutcome>>> {
    let kind = entity(&entity_name)?;
    ensure_enabled(&state)?;

    let scope = if query.force {
        TranslationScope::All
    } else {
        TranslationScope::MissingOnly
    };
    let outcome = state
        .translator()
        .translate_listing(kind, id, &scope)
        .await?;
    Ok(Json(ApiResponse::success(outcome)))
}

pub async fn translate_missing(
    State(state): State<AppState>,
    ApiPath(entity_name): ApiPath<String>,
    ApiQuery(query): ApiQuery<BackfillQuery>,
) -> AppResult<Json<ApiResponse<BackfillSummary>>> {
    let kind = entity(&entity_name)?;
    ensure_enabled(&state)?;

    let summary = state.translator().backfill(kind, query.limit()).await?;
    Ok(Json(ApiResponse::success(summary)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backfill_limit_is_clamped() {
        assert_eq!(BackfillQuery::default().limit(), DEFAULT_BACKFILL_LIMIT);
        assert_eq!(BackfillQuery { limit: Some(0) }.limit(), 1);
        assert_eq!(BackfillQuery { limit: Some(5000) }.limit(), MAX_BACKFILL_LIMIT);
    }
}
