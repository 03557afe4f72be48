use async_trait::async_trait;
use arena_model::Favorite;
use uuid::Uuid;

use crate::error::Result;

#[async_trait]
pub trait FavoritesRepository: Send + Sync {
    /// Newest first, optionally narrowed to one item tag.
    async fn list(
        &self,
        user_id: Uuid,
        item_type: Option<&str>,
    ) -> Result<Vec<Favorite>>;

    /// Returns the stored row and whether it was inserted by this call.
    async fn add(
        &self,
        user_id: Uuid,
        item_type: &str,
        item_id: i64,
    ) -> Result<(Favorite, bool)>;

    async fn remove(
        &self,
        user_id: Uuid,
        item_type: &str,
        item_id: i64,
    ) -> Result<bool>;

    async fn exists(
        &self,
        user_id: Uuid,
        item_type: &str,
        item_id: i64,
    ) -> Result<bool>;

    /// Drop every user's favorite pointing at one listing.
    async fn remove_for_item(&self, item_type: &str, item_id: i64) -> Result<u64>;
}
