use std::collections::BTreeMap;
use std::sync::Arc;

use arena_config::TranslationConfig;
use arena_model::{BackfillSummary, Locale, TranslationOutcome};
use tracing::{debug, error, info, warn};

use super::client::{CompletionClient, OpenAiCompatibleClient};
use super::prompt;
use crate::catalog::schema::companion_column;
use crate::catalog::{EntityKind, Listing};
use crate::database::ports::ListingRepository;
use crate::error::{ArenaError, Result};

pub const NOTHING_TO_TRANSLATE: &str = "nothing to translate";

/// Which Spanish source fields a translation run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationScope {
    All,
    Fields(Vec<String>),
    /// Only sources whose `_en` or `_pt` companion is still empty.
    MissingOnly,
    /// What the backfill queue owes a row: every source when the row was
    /// edited after its last translation, otherwise the missing ones.
    Pending,
}

impl TranslationScope {
    fn includes(&self, listing: &Listing, column: &str) -> bool {
        match self {
            TranslationScope::All => true,
            TranslationScope::Fields(fields) => fields.iter().any(|f| f == column),
            TranslationScope::MissingOnly => Locale::TRANSLATED.into_iter().any(|locale| {
                companion_column(column, locale)
                    .is_some_and(|companion| listing.text(&companion).is_none())
            }),
            TranslationScope::Pending => {
                listing.text("traducido_at").is_some()
                    || TranslationScope::MissingOnly.includes(listing, column)
            }
        }
    }
}

/// Fills `_en` / `_pt` columns from the Spanish text of a listing with a
/// single LLM call per row.
#[derive(Clone)]
pub struct AutoTranslator {
    listings: Arc<dyn ListingRepository>,
    client: Option<Arc<dyn CompletionClient>>,
}

impl std::fmt::Debug for AutoTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoTranslator")
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

impl AutoTranslator {
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        client: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            listings,
            client: Some(client),
        }
    }

    pub fn disabled(listings: Arc<dyn ListingRepository>) -> Self {
        Self {
            listings,
            client: None,
        }
    }

    pub fn from_config(
        listings: Arc<dyn ListingRepository>,
        config: &TranslationConfig,
    ) -> Result<Self> {
        if !config.enabled {
            info!("Auto-translation disabled");
            return Ok(Self::disabled(listings));
        }
        let client = OpenAiCompatibleClient::from_config(config)?;
        info!(model = %config.model, endpoint = %config.endpoint, "Auto-translation enabled");
        Ok(Self::new(listings, Arc::new(client)))
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&Arc<dyn CompletionClient>> {
        self.client
            .as_ref()
            .ok_or_else(|| ArenaError::Translation("translation is disabled".to_string()))
    }

    pub async fn translate_listing(
        &self,
        kind: EntityKind,
        id: i64,
        scope: &TranslationScope,
    ) -> Result<TranslationOutcome> {
        let client = self.client()?;
        let listing = self
            .listings
            .get(kind, id, true)
            .await?
            .ok_or_else(|| ArenaError::not_found(format!("{kind} {id}")))?;

        let sources: BTreeMap<String, String> = kind
            .schema()
            .translatable()
            .filter(|column| scope.includes(&listing, column.name))
            .filter_map(|column| {
                listing
                    .text(column.name)
                    .map(|text| (column.name.to_string(), text.to_string()))
            })
            .collect();

        if sources.is_empty() {
            // Stamp the row so backfill stops picking it up.
            self.listings.write_translations(kind, id, &[]).await?;
            debug!(entity = %kind, id, "No source text in scope");
            return Ok(TranslationOutcome::skipped(
                kind.table(),
                id,
                NOTHING_TO_TRANSLATE,
            ));
        }

        let system = prompt::system_prompt();
        let user = prompt::user_prompt(&sources)?;
        let reply = client.complete(&system, &user).await?;

        let expected: Vec<&str> = sources.keys().map(String::as_str).collect();
        let translations = prompt::parse_reply(&reply, &expected)?;

        let columns: Vec<(String, String)> = translations
            .iter()
            .flat_map(|(locale, fields)| {
                fields.iter().filter_map(move |(field, text)| {
                    companion_column(field, *locale).map(|column| (column, text.clone()))
                })
            })
            .collect();

        if !self.listings.write_translations(kind, id, &columns).await? {
            return Err(ArenaError::not_found(format!("{kind} {id}")));
        }

        info!(entity = %kind, id, columns = columns.len(), "Listing translated");
        Ok(TranslationOutcome {
            entity: kind.table().to_string(),
            id,
            fields: sources.into_keys().collect(),
            columns_written: columns.into_iter().map(|(column, _)| column).collect(),
            skipped: None,
        })
    }

    /// Run a translation in the background. Failures are logged only.
    pub fn spawn(&self, kind: EntityKind, id: i64, scope: TranslationScope) {
        if !self.is_enabled() {
            debug!(entity = %kind, id, "Auto-translation disabled, not spawning");
            return;
        }

        let translator = self.clone();
        tokio::spawn(async move {
            match translator.translate_listing(kind, id, &scope).await {
                Ok(outcome) if outcome.was_skipped() => {
                    debug!(entity = %kind, id, "Auto-translation skipped");
                }
                Ok(_) => {}
                Err(e) => {
                    error!(entity = %kind, id, error = %e, "Auto-translation failed");
                }
            }
        });
    }

    /// Translate rows whose translations are missing or stale, one at a time.
    pub async fn backfill(&self, kind: EntityKind, limit: u32) -> Result<BackfillSummary> {
        self.client()?;
        let ids = self.listings.pending_translation(kind, limit).await?;
        let mut summary = BackfillSummary::default();

        for id in ids {
            summary.processed += 1;
            match self
                .translate_listing(kind, id, &TranslationScope::Pending)
                .await
            {
                Ok(outcome) if outcome.was_skipped() => {}
                Ok(_) => summary.translated += 1,
                Err(e) => {
                    warn!(entity = %kind, id, error = %e, "Backfill translation failed");
                    summary.failed += 1;
                }
            }
        }

        info!(
            entity = %kind,
            processed = summary.processed,
            translated = summary.translated,
            failed = summary.failed,
            "Translation backfill finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ListingFields, WriteMode};
    use crate::testing::InMemoryListingRepository;
    use crate::translation::client::MockCompletionClient;
    use serde_json::json;

    async fn seeded(payload: serde_json::Value) -> (Arc<InMemoryListingRepository>, i64) {
        let repo = Arc::new(InMemoryListingRepository::default());
        let fields =
            ListingFields::from_payload(EntityKind::Bares, &payload, WriteMode::Create).unwrap();
        let listing = repo.create(&fields).await.unwrap();
        (repo, listing.id)
    }

    fn replying(reply: &'static str, times: usize) -> Arc<MockCompletionClient> {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .times(times)
            .returning(move |_, _| Ok(reply.to_string()));
        Arc::new(client)
    }

    #[tokio::test]
    async fn writes_companion_columns() {
        let (repo, id) = seeded(json!({
            "nombre": "La Biblioteca",
            "descripcion": "Bar de cócteles",
            "horario": "De 20 a 3"
        }))
        .await;
        let client = replying(
            r#"```json
            {"en": {"descripcion": "Cocktail bar", "horario": "8pm to 3am"},
             "pt": {"descripcion": "Bar de coquetéis", "horario": ""}}
            ```"#,
            1,
        );
        let translator = AutoTranslator::new(repo.clone(), client);

        let outcome = translator
            .translate_listing(EntityKind::Bares, id, &TranslationScope::All)
            .await
            .unwrap();
        assert_eq!(outcome.fields, vec!["descripcion", "horario"]);
        assert_eq!(outcome.columns_written.len(), 3);

        let row = repo.get(EntityKind::Bares, id, true).await.unwrap().unwrap();
        assert_eq!(row.text("descripcion_en"), Some("Cocktail bar"));
        assert_eq!(row.text("descripcion_pt"), Some("Bar de coquetéis"));
        assert_eq!(row.text("horario_pt"), None);
        assert!(row.text("traducido_at").is_some());
    }

    #[tokio::test]
    async fn scope_limits_fields_sent() {
        let (repo, id) = seeded(json!({
            "nombre": "Bar",
            "descripcion": "Nuevo texto",
            "tipo_bar": "Cervecería"
        }))
        .await;
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(|_, user| user.contains("Nuevo texto") && !user.contains("Cervecería"))
            .times(1)
            .returning(|_, _| Ok(r#"{"en": {"descripcion": "New text"}}"#.to_string()));
        let translator = AutoTranslator::new(repo, Arc::new(client));

        let scope = TranslationScope::Fields(vec!["descripcion".to_string()]);
        let outcome = translator
            .translate_listing(EntityKind::Bares, id, &scope)
            .await
            .unwrap();
        assert_eq!(outcome.columns_written, vec!["descripcion_en"]);
    }

    #[tokio::test]
    async fn missing_only_skips_complete_rows_without_calling_the_model() {
        let (repo, id) = seeded(json!({
            "nombre": "Bar",
            "descripcion": "Texto",
            "descripcion_en": "Text",
            "descripcion_pt": "Texto"
        }))
        .await;
        let translator = AutoTranslator::new(repo.clone(), replying("{}", 0));

        let outcome = translator
            .translate_listing(EntityKind::Bares, id, &TranslationScope::MissingOnly)
            .await
            .unwrap();
        assert_eq!(outcome.skipped.as_deref(), Some(NOTHING_TO_TRANSLATE));
        assert!(repo.pending_translation(EntityKind::Bares, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_rows_and_bad_replies_are_errors() {
        let (repo, id) = seeded(json!({ "nombre": "Bar", "descripcion": "Texto" })).await;
        let translator = AutoTranslator::new(repo, replying("lo siento, no puedo", 1));

        assert!(matches!(
            translator
                .translate_listing(EntityKind::Bares, id + 100, &TranslationScope::All)
                .await,
            Err(ArenaError::NotFound(_))
        ));
        assert!(matches!(
            translator
                .translate_listing(EntityKind::Bares, id, &TranslationScope::All)
                .await,
            Err(ArenaError::Translation(_))
        ));
    }

    #[tokio::test]
    async fn backfill_counts_outcomes() {
        let repo = Arc::new(InMemoryListingRepository::default());
        for payload in [
            json!({ "nombre": "Uno", "descripcion": "Primero" }),
            json!({ "nombre": "Dos" }),
            json!({ "nombre": "Tres", "descripcion": "Tercero" }),
        ] {
            let fields =
                ListingFields::from_payload(EntityKind::Cafes, &payload, WriteMode::Create)
                    .unwrap();
            repo.create(&fields).await.unwrap();
        }

        let mut client = MockCompletionClient::new();
        client.expect_complete().times(2).returning(|_, user| {
            if user.contains("Primero") {
                Ok(r#"{"en": {"descripcion": "First"}, "pt": {"descripcion": "Primeiro"}}"#.to_string())
            } else {
                Err(ArenaError::Translation("LLM endpoint returned 500".to_string()))
            }
        });
        let translator = AutoTranslator::new(repo.clone(), Arc::new(client));

        let summary = translator.backfill(EntityKind::Cafes, 10).await.unwrap();
        assert_eq!(
            summary,
            BackfillSummary {
                processed: 3,
                translated: 1,
                failed: 1
            }
        );
        let pending = repo.pending_translation(EntityKind::Cafes, 10).await.unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[tokio::test]
    async fn backfill_retranslates_rows_edited_after_translation() {
        let (repo, id) = seeded(json!({ "nombre": "Verne", "descripcion": "Texto viejo" })).await;
        repo.write_translations(
            EntityKind::Bares,
            id,
            &[
                ("descripcion_en".to_string(), "Old text".to_string()),
                ("descripcion_pt".to_string(), "Texto antigo".to_string()),
            ],
        )
        .await
        .unwrap();
        let edit = ListingFields::from_payload(
            EntityKind::Bares,
            &json!({ "descripcion": "Texto nuevo" }),
            WriteMode::Update,
        )
        .unwrap();
        repo.update(id, &edit).await.unwrap();
        assert_eq!(
            repo.pending_translation(EntityKind::Bares, 10).await.unwrap(),
            vec![id]
        );

        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(|_, user| user.contains("Texto nuevo"))
            .times(1)
            .returning(|_, _| {
                Ok(r#"{"en": {"descripcion": "New text"}, "pt": {"descripcion": "Texto novo"}}"#
                    .to_string())
            });
        let translator = AutoTranslator::new(repo.clone(), Arc::new(client));

        let summary = translator.backfill(EntityKind::Bares, 10).await.unwrap();
        assert_eq!(
            summary,
            BackfillSummary {
                processed: 1,
                translated: 1,
                failed: 0
            }
        );
        let row = repo.get(EntityKind::Bares, id, true).await.unwrap().unwrap();
        assert_eq!(row.text("descripcion_en"), Some("New text"));
        assert_eq!(row.text("descripcion_pt"), Some("Texto novo"));
        assert!(repo.pending_translation(EntityKind::Bares, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn disabled_translator_refuses_work() {
        let repo = Arc::new(InMemoryListingRepository::default());
        let translator = AutoTranslator::disabled(repo);
        assert!(!translator.is_enabled());
        translator.spawn(EntityKind::Bares, 1, TranslationScope::All);
        assert!(matches!(
            translator.backfill(EntityKind::Bares, 5).await,
            Err(ArenaError::Translation(_))
        ));
    }
}
