use serde::{Deserialize, Serialize};

/// What a single translation run did to one listing row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TranslationOutcome {
    pub entity: String,
    pub id: i64,
    /// Spanish source fields that were sent to the model.
    pub fields: Vec<String>,
    /// `_en` / `_pt` columns actually written back.
    pub columns_written: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

impl TranslationOutcome {
    pub fn skipped(
        entity: impl Into<String>,
        id: i64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            entity: entity.into(),
            id,
            skipped: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn was_skipped(&self) -> bool {
        self.skipped.is_some()
    }
}

/// Summary of a backfill over rows with stale or missing translations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BackfillSummary {
    pub processed: u32,
    pub translated: u32,
    pub failed: u32,
}
