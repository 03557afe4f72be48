use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookmark of one listing by one user.
///
/// `item_type` is the singular entity tag (`restaurante`, `bar`, ...), not the
/// table name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_type: String,
    pub item_id: i64,
    pub created_at: DateTime<Utc>,
    /// Hydrated listing row, only present when the caller asked for `expand`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteRequest {
    pub item_type: String,
    pub item_id: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavoriteStatus {
    pub is_favorite: bool,
}
