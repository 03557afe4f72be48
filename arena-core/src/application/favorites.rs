use arena_model::{Favorite, FavoriteRequest, FavoriteStatus, Locale};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::unit_of_work::AppUnitOfWork;
use crate::catalog::EntityKind;
use crate::error::{ArenaError, Result};

/// Per-user bookmarks across every listing kind.
#[derive(Debug, Clone)]
pub struct FavoritesService {
    uow: AppUnitOfWork,
}

impl FavoritesService {
    pub fn new(uow: AppUnitOfWork) -> Self {
        Self { uow }
    }

    /// Newest first. With `expand`, each favorite carries its localized
    /// listing, or `null` once the listing is gone or inactive.
    pub async fn list(
        &self,
        user_id: Uuid,
        item_type: Option<&str>,
        expand: bool,
        locale: Locale,
    ) -> Result<Vec<Favorite>> {
        let tag = match item_type.map(str::trim).filter(|t| !t.is_empty()) {
            Some(raw) => Some(
                raw.parse::<EntityKind>()
                    .map_err(|_| ArenaError::invalid(format!("unknown item_type '{raw}'")))?
                    .item_tag(),
            ),
            None => None,
        };

        let mut favorites = self.uow.favorites.list(user_id, tag).await?;
        if !expand {
            return Ok(favorites);
        }

        for favorite in &mut favorites {
            let item = match favorite.item_type.parse::<EntityKind>() {
                Ok(kind) => self
                    .uow
                    .listings
                    .get(kind, favorite.item_id, false)
                    .await?
                    .map(|listing| listing.localized(locale).into_value()),
                Err(_) => None,
            };
            favorite.item = Some(item.unwrap_or(Value::Null));
        }
        Ok(favorites)
    }

    /// Returns the favorite and whether this call created it.
    pub async fn add(&self, user_id: Uuid, request: &FavoriteRequest) -> Result<(Favorite, bool)> {
        let kind = self.existing_listing(request).await?;
        let (favorite, created) = self
            .uow
            .favorites
            .add(user_id, kind.item_tag(), request.item_id)
            .await?;
        debug!(%user_id, entity = %kind, id = request.item_id, created, "favorite added");
        Ok((favorite, created))
    }

    pub async fn remove(&self, user_id: Uuid, item_type: &str, item_id: i64) -> Result<()> {
        let kind: EntityKind = item_type.parse()?;
        if !self
            .uow
            .favorites
            .remove(user_id, kind.item_tag(), item_id)
            .await?
        {
            return Err(ArenaError::not_found(format!(
                "favorite {} {item_id}",
                kind.item_tag()
            )));
        }
        Ok(())
    }

    pub async fn status(&self, user_id: Uuid, item_type: &str, item_id: i64) -> Result<FavoriteStatus> {
        let kind: EntityKind = item_type.parse()?;
        let is_favorite = self
            .uow
            .favorites
            .exists(user_id, kind.item_tag(), item_id)
            .await?;
        Ok(FavoriteStatus { is_favorite })
    }

    pub async fn toggle(&self, user_id: Uuid, request: &FavoriteRequest) -> Result<FavoriteStatus> {
        let kind: EntityKind = request.item_type.parse()?;
        let tag = kind.item_tag();

        if self.uow.favorites.remove(user_id, tag, request.item_id).await? {
            return Ok(FavoriteStatus { is_favorite: false });
        }

        self.add(user_id, request).await?;
        Ok(FavoriteStatus { is_favorite: true })
    }

    async fn existing_listing(&self, request: &FavoriteRequest) -> Result<EntityKind> {
        let kind: EntityKind = request.item_type.parse()?;
        if self
            .uow
            .listings
            .get(kind, request.item_id, false)
            .await?
            .is_none()
        {
            return Err(ArenaError::not_found(format!("{kind} {}", request.item_id)));
        }
        Ok(kind)
    }
}
