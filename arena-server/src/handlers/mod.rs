pub mod accounts;
pub mod favorites;
pub mod health;
pub mod listings;
pub mod translations;
pub mod uploads;

use arena_core::catalog::EntityKind;
use arena_model::Locale;
use serde::Deserialize;

use crate::infra::errors::{AppError, AppResult};

/// `?lang=` accepted by every localized read.
#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

impl LangQuery {
    pub fn locale(&self) -> AppResult<Locale> {
        match self.lang.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            Some(raw) => raw.parse().map_err(AppError::bad_request),
            None => Ok(Locale::default()),
        }
    }
}

/// Unknown entities are reported as 404.
pub(crate) fn entity(raw: &str) -> AppResult<EntityKind> {
    Ok(raw.parse::<EntityKind>()?)
}
