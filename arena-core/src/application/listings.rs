use arena_model::{Locale, Page};
use serde_json::Value;
use tracing::info;

use super::unit_of_work::AppUnitOfWork;
use crate::catalog::{EntityKind, Listing, ListingFields, ListingQuery, WriteMode};
use crate::error::{ArenaError, Result};
use crate::translation::{AutoTranslator, TranslationScope};

/// Listing reads for the consumer app and writes for the back-office.
#[derive(Debug, Clone)]
pub struct ListingService {
    uow: AppUnitOfWork,
    translator: AutoTranslator,
}

fn missing(kind: EntityKind, id: i64) -> ArenaError {
    ArenaError::not_found(format!("{kind} {id}"))
}

impl ListingService {
    pub fn new(uow: AppUnitOfWork, translator: AutoTranslator) -> Self {
        Self { uow, translator }
    }

    pub fn translator(&self) -> &AutoTranslator {
        &self.translator
    }

    /// Active rows only, localized.
    pub async fn list_public(
        &self,
        kind: EntityKind,
        query: ListingQuery,
        locale: Locale,
    ) -> Result<Page<Listing>> {
        let page = self.uow.listings.list(kind, &query.public()).await?;
        Ok(page.map(|listing| listing.localized(locale)))
    }

    pub async fn get_public(&self, kind: EntityKind, id: i64, locale: Locale) -> Result<Listing> {
        self.uow
            .listings
            .get(kind, id, false)
            .await?
            .map(|listing| listing.localized(locale))
            .ok_or_else(|| missing(kind, id))
    }

    pub async fn list_admin(&self, kind: EntityKind, query: &ListingQuery) -> Result<Page<Listing>> {
        self.uow.listings.list(kind, query).await
    }

    pub async fn get_admin(&self, kind: EntityKind, id: i64) -> Result<Listing> {
        self.uow
            .listings
            .get(kind, id, true)
            .await?
            .ok_or_else(|| missing(kind, id))
    }

    pub async fn create(&self, kind: EntityKind, payload: &Value) -> Result<Listing> {
        let fields = ListingFields::from_payload(kind, payload, WriteMode::Create)?;
        let listing = self.uow.listings.create(&fields).await?;

        self.translator.spawn(kind, listing.id, TranslationScope::All);
        Ok(listing)
    }

    /// Only the Spanish sources present in the payload are re-translated.
    pub async fn update(&self, kind: EntityKind, id: i64, payload: &Value) -> Result<Listing> {
        let fields = ListingFields::from_payload(kind, payload, WriteMode::Update)?;
        let listing = self
            .uow
            .listings
            .update(id, &fields)
            .await?
            .ok_or_else(|| missing(kind, id))?;

        let changed = fields.changed_sources();
        if !changed.is_empty() {
            let scope =
                TranslationScope::Fields(changed.into_iter().map(str::to_string).collect());
            self.translator.spawn(kind, id, scope);
        }
        Ok(listing)
    }

    pub async fn delete(&self, kind: EntityKind, id: i64) -> Result<()> {
        if !self.uow.listings.delete(kind, id).await? {
            return Err(missing(kind, id));
        }

        let removed = self
            .uow
            .favorites
            .remove_for_item(kind.item_tag(), id)
            .await?;
        if removed > 0 {
            info!(entity = %kind, id, removed, "removed favorites of deleted listing");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::ports::{FavoritesRepository, ListingRepository};
    use crate::testing::InMemoryStore;
    use crate::translation::MockCompletionClient;
    use serde_json::json;
    use std::sync::Arc;
    use uuid::Uuid;

    fn service(store: &InMemoryStore) -> ListingService {
        ListingService::new(
            store.unit_of_work(),
            AutoTranslator::disabled(store.listings.clone()),
        )
    }

    #[tokio::test]
    async fn public_reads_hide_inactive_rows_and_localize() {
        let store = InMemoryStore::default();
        let service = service(&store);

        let visible = service
            .create(
                EntityKind::Galerias,
                &json!({ "nombre": "Fola", "tipo_arte": "Fotografía", "tipo_arte_en": "Photography" }),
            )
            .await
            .unwrap();
        let hidden = service
            .create(EntityKind::Galerias, &json!({ "nombre": "Oculta", "activo": false }))
            .await
            .unwrap();

        let page = service
            .list_public(
                EntityKind::Galerias,
                ListingQuery {
                    include_inactive: Some(true),
                    ..ListingQuery::default()
                },
                Locale::En,
            )
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].text("tipo_arte"), Some("Photography"));

        assert!(matches!(
            service.get_public(EntityKind::Galerias, hidden.id, Locale::Es).await,
            Err(ArenaError::NotFound(_))
        ));
        assert_eq!(
            service
                .get_admin(EntityKind::Galerias, hidden.id)
                .await
                .unwrap()
                .text("nombre"),
            Some("Oculta")
        );

        let es = service
            .get_public(EntityKind::Galerias, visible.id, Locale::Es)
            .await
            .unwrap();
        assert_eq!(es.text("tipo_arte"), Some("Fotografía"));
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let store = InMemoryStore::default();
        let service = service(&store);

        assert!(matches!(
            service
                .update(EntityKind::Bares, 404, &json!({ "zona": "Centro" }))
                .await,
            Err(ArenaError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(EntityKind::Bares, 404).await,
            Err(ArenaError::NotFound(_))
        ));
        assert!(matches!(
            service.create(EntityKind::Bares, &json!({ "zona": "Centro" })).await,
            Err(ArenaError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_favorites_of_the_row() {
        let store = InMemoryStore::default();
        let service = service(&store);
        let bar = service
            .create(EntityKind::Bares, &json!({ "nombre": "Doppelgänger" }))
            .await
            .unwrap();
        let user = Uuid::new_v4();
        store.favorites.add(user, "bar", bar.id).await.unwrap();
        store.favorites.add(user, "cafe", bar.id).await.unwrap();

        service.delete(EntityKind::Bares, bar.id).await.unwrap();

        let left = store.favorites.list(user, None).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].item_type, "cafe");
    }

    #[tokio::test]
    async fn update_translates_only_changed_sources() {
        let store = InMemoryStore::default();
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(|_, user| user.contains("horario") && !user.contains("descripcion"))
            .times(1)
            .returning(|_, _| Ok(r#"{"en": {"horario": "Always open"}}"#.to_string()));
        let translator = AutoTranslator::new(store.listings.clone(), Arc::new(client));
        let service = ListingService::new(store.unit_of_work(), translator);

        let cafe = store
            .listings
            .create(
                &ListingFields::from_payload(
                    EntityKind::Cafes,
                    &json!({ "nombre": "Café", "descripcion": "Rico" }),
                    WriteMode::Create,
                )
                .unwrap(),
            )
            .await
            .unwrap();

        service
            .update(EntityKind::Cafes, cafe.id, &json!({ "horario": "Siempre abierto" }))
            .await
            .unwrap();

        let mut translated = None;
        for _ in 0..50 {
            let row = store
                .listings
                .get(EntityKind::Cafes, cafe.id, true)
                .await
                .unwrap()
                .unwrap();
            if let Some(text) = row.text("horario_en") {
                translated = Some(text.to_string());
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(translated.as_deref(), Some("Always open"));
    }
}
