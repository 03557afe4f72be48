use async_trait::async_trait;
use arena_model::Page;

use crate::catalog::{EntityKind, Listing, ListingFields, ListingQuery};
use crate::error::Result;

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn list(
        &self,
        kind: EntityKind,
        query: &ListingQuery,
    ) -> Result<Page<Listing>>;

    /// Inactive rows are only returned when `include_inactive` is set.
    async fn get(
        &self,
        kind: EntityKind,
        id: i64,
        include_inactive: bool,
    ) -> Result<Option<Listing>>;

    async fn create(&self, fields: &ListingFields) -> Result<Listing>;

    /// Returns `None` when no row has `id`.
    async fn update(&self, id: i64, fields: &ListingFields)
    -> Result<Option<Listing>>;

    async fn delete(&self, kind: EntityKind, id: i64) -> Result<bool>;

    /// Write `_en` / `_pt` columns and stamp `traducido_at`.
    async fn write_translations(
        &self,
        kind: EntityKind,
        id: i64,
        columns: &[(String, String)],
    ) -> Result<bool>;

    /// Ids whose translations are missing or older than the last edit.
    async fn pending_translation(
        &self,
        kind: EntityKind,
        limit: u32,
    ) -> Result<Vec<i64>>;
}
