use async_trait::async_trait;
use arena_model::Favorite;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::database::ports::FavoritesRepository;
use crate::error::Result;

/// PostgreSQL-backed implementation of the `FavoritesRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresFavoritesRepository {
    pool: PgPool,
}

impl PostgresFavoritesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(FromRow)]
struct FavoriteRow {
    id: Uuid,
    user_id: Uuid,
    item_type: String,
    item_id: i64,
    created_at: DateTime<Utc>,
}

impl From<FavoriteRow> for Favorite {
    fn from(row: FavoriteRow) -> Self {
        Favorite {
            id: row.id,
            user_id: row.user_id,
            item_type: row.item_type,
            item_id: row.item_id,
            created_at: row.created_at,
            item: None,
        }
    }
}

#[async_trait]
impl FavoritesRepository for PostgresFavoritesRepository {
    async fn list(
        &self,
        user_id: Uuid,
        item_type: Option<&str>,
    ) -> Result<Vec<Favorite>> {
        let rows: Vec<FavoriteRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, item_type, item_id, created_at
            FROM favoritos
            WHERE user_id = $1 AND ($2::TEXT IS NULL OR item_type = $2)
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(user_id)
        .bind(item_type)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Favorite::from).collect())
    }

    async fn add(
        &self,
        user_id: Uuid,
        item_type: &str,
        item_id: i64,
    ) -> Result<(Favorite, bool)> {
        let inserted: Option<FavoriteRow> = sqlx::query_as(
            r#"
            INSERT INTO favoritos (id, user_id, item_type, item_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, item_type, item_id) DO NOTHING
            RETURNING id, user_id, item_type, item_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(item_type)
        .bind(item_id)
        .fetch_optional(self.pool())
        .await?;

        if let Some(row) = inserted {
            debug!(%user_id, item_type, item_id, "added favorite");
            return Ok((row.into(), true));
        }

        let existing: FavoriteRow = sqlx::query_as(
            r#"
            SELECT id, user_id, item_type, item_id, created_at
            FROM favoritos
            WHERE user_id = $1 AND item_type = $2 AND item_id = $3
            "#,
        )
        .bind(user_id)
        .bind(item_type)
        .bind(item_id)
        .fetch_one(self.pool())
        .await?;

        Ok((existing.into(), false))
    }

    async fn remove(
        &self,
        user_id: Uuid,
        item_type: &str,
        item_id: i64,
    ) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM favoritos WHERE user_id = $1 AND item_type = $2 AND item_id = $3",
        )
        .bind(user_id)
        .bind(item_type)
        .bind(item_id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(
        &self,
        user_id: Uuid,
        item_type: &str,
        item_id: i64,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM favoritos
                WHERE user_id = $1 AND item_type = $2 AND item_id = $3
            )
            "#,
        )
        .bind(user_id)
        .bind(item_type)
        .bind(item_id)
        .fetch_one(self.pool())
        .await?;

        Ok(exists)
    }

    async fn remove_for_item(&self, item_type: &str, item_id: i64) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM favoritos WHERE item_type = $1 AND item_id = $2",
        )
        .bind(item_type)
        .bind(item_id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected())
    }
}
