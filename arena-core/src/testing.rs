//! In-memory adapters for the repository ports, used by unit tests here and
//! by the server's HTTP tests through the `test-support` feature.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use arena_model::{Favorite, Page, Role, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::unit_of_work::AppUnitOfWork;
use crate::catalog::schema::companion_column;
use crate::catalog::{
    ColumnType, EntityKind, Listing, ListingFields, ListingQuery, WritableColumn,
};
use crate::database::ports::{
    FavoritesRepository, HealthCheck, ListingRepository, StoredUser, UserRepository,
};
use crate::error::{ArenaError, Result};
use arena_model::Locale;

#[derive(Debug, Clone)]
struct StoredRow {
    data: Map<String, Value>,
    updated_at: DateTime<Utc>,
    traducido_at: Option<DateTime<Utc>>,
}

impl StoredRow {
    fn listing(&self, kind: EntityKind, id: i64) -> Listing {
        Listing {
            kind,
            id,
            data: self.data.clone(),
        }
    }

    fn text(&self, column: &str) -> Option<&str> {
        self.data.get(column).and_then(Value::as_str)
    }

    fn is_active(&self) -> bool {
        self.data.get("activo").and_then(Value::as_bool).unwrap_or(true)
    }
}

fn blank_row(kind: EntityKind) -> Map<String, Value> {
    let mut data = Map::new();
    for column in kind.schema().columns() {
        let default = match (column.ty, column.name) {
            (ColumnType::Boolean, "activo") => Value::Bool(true),
            (ColumnType::Boolean, _) => Value::Bool(false),
            _ => Value::Null,
        };
        data.insert(column.name.to_string(), default);
        if column.translatable {
            for locale in Locale::TRANSLATED {
                if let Some(companion) = companion_column(column.name, locale) {
                    data.insert(companion, Value::Null);
                }
            }
        }
    }
    data
}

fn matches_query(kind: EntityKind, row: &StoredRow, query: &ListingQuery) -> bool {
    if !query.include_inactive() && !row.is_active() {
        return false;
    }
    if let Some(term) = query.search_term() {
        let term = term.to_lowercase();
        let hit = ["nombre", "descripcion"].into_iter().any(|column| {
            row.text(column)
                .is_some_and(|text| text.to_lowercase().contains(&term))
        });
        if !hit {
            return false;
        }
    }
    if let Some(zona) = query.zona()
        && !row.text("zona").is_some_and(|z| z.eq_ignore_ascii_case(zona))
    {
        return false;
    }
    if let Some(destacado) = query.destacado
        && row.data.get("destacado").and_then(Value::as_bool) != Some(destacado)
    {
        return false;
    }
    if kind.is_dated() && query.upcoming() {
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        let last_day = row.text("fecha_fin").or_else(|| row.text("fecha_inicio"));
        if !last_day.is_some_and(|day| day >= today.as_str()) {
            return false;
        }
    }
    true
}

/// Listing tables kept in memory, ordered and filtered like the SQL adapter.
#[derive(Debug, Default)]
pub struct InMemoryListingRepository {
    tables: Mutex<HashMap<EntityKind, BTreeMap<i64, StoredRow>>>,
    next_id: AtomicI64,
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn list(&self, kind: EntityKind, query: &ListingQuery) -> Result<Page<Listing>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<(i64, &StoredRow)> = tables
            .get(&kind)
            .into_iter()
            .flatten()
            .filter(|(_, row)| matches_query(kind, row, query))
            .map(|(id, row)| (*id, row))
            .collect();

        rows.sort_by(|&(a_id, a), &(b_id, b)| {
            let name = |row: &StoredRow| row.text("nombre").unwrap_or_default().to_string();
            if kind.is_dated() {
                let start = |row: &StoredRow| row.text("fecha_inicio").map(str::to_string);
                start(a)
                    .cmp(&start(b))
                    .then_with(|| name(a).cmp(&name(b)))
                    .then_with(|| a_id.cmp(&b_id))
            } else {
                let featured = |row: &StoredRow| {
                    row.data.get("destacado").and_then(Value::as_bool).unwrap_or(false)
                };
                featured(b)
                    .cmp(&featured(a))
                    .then_with(|| name(a).cmp(&name(b)))
                    .then_with(|| a_id.cmp(&b_id))
            }
        });

        let total = rows.len() as u64;
        let items = rows
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.per_page() as usize)
            .map(|(id, row)| row.listing(kind, id))
            .collect();

        Ok(Page::new(items, query.page(), query.per_page(), total))
    }

    async fn get(
        &self,
        kind: EntityKind,
        id: i64,
        include_inactive: bool,
    ) -> Result<Option<Listing>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .get(&kind)
            .and_then(|rows| rows.get(&id))
            .filter(|row| include_inactive || row.is_active())
            .map(|row| row.listing(kind, id)))
    }

    async fn create(&self, fields: &ListingFields) -> Result<Listing> {
        let kind = fields.kind();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();

        let mut data = blank_row(kind);
        data.extend(fields.to_json());
        data.insert("id".to_string(), Value::from(id));
        data.insert("created_at".to_string(), Value::String(now.to_rfc3339()));
        data.insert("updated_at".to_string(), Value::String(now.to_rfc3339()));
        data.insert("traducido_at".to_string(), Value::Null);

        let row = StoredRow {
            data,
            updated_at: now,
            traducido_at: None,
        };
        let listing = row.listing(kind, id);
        self.tables
            .lock()
            .await
            .entry(kind)
            .or_default()
            .insert(id, row);
        Ok(listing)
    }

    async fn update(&self, id: i64, fields: &ListingFields) -> Result<Option<Listing>> {
        let kind = fields.kind();
        let mut tables = self.tables.lock().await;
        let Some(row) = tables.get_mut(&kind).and_then(|rows| rows.get_mut(&id)) else {
            return Ok(None);
        };

        let now = Utc::now();
        row.data.extend(fields.to_json());
        row.data
            .insert("updated_at".to_string(), Value::String(now.to_rfc3339()));
        row.updated_at = now;
        Ok(Some(row.listing(kind, id)))
    }

    async fn delete(&self, kind: EntityKind, id: i64) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        Ok(tables
            .get_mut(&kind)
            .is_some_and(|rows| rows.remove(&id).is_some()))
    }

    async fn write_translations(
        &self,
        kind: EntityKind,
        id: i64,
        columns: &[(String, String)],
    ) -> Result<bool> {
        let schema = kind.schema();
        if let Some((column, _)) = columns.iter().find(|(column, _)| {
            !matches!(schema.writable(column), Some(WritableColumn::Companion { .. }))
        }) {
            return Err(ArenaError::invalid(format!(
                "'{column}' is not a translation column of {kind}"
            )));
        }

        let mut tables = self.tables.lock().await;
        let Some(row) = tables.get_mut(&kind).and_then(|rows| rows.get_mut(&id)) else {
            return Ok(false);
        };

        let now = Utc::now();
        for (column, text) in columns {
            row.data.insert(column.clone(), Value::String(text.clone()));
        }
        row.data
            .insert("traducido_at".to_string(), Value::String(now.to_rfc3339()));
        row.traducido_at = Some(now);
        Ok(true)
    }

    async fn pending_translation(&self, kind: EntityKind, limit: u32) -> Result<Vec<i64>> {
        let tables = self.tables.lock().await;
        let mut pending: Vec<(DateTime<Utc>, i64)> = tables
            .get(&kind)
            .into_iter()
            .flatten()
            .filter(|(_, row)| row.traducido_at.is_none_or(|at| at < row.updated_at))
            .map(|(id, row)| (row.updated_at, *id))
            .collect();
        pending.sort();
        Ok(pending
            .into_iter()
            .take(limit as usize)
            .map(|(_, id)| id)
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, StoredUser>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: &User, password_hash: &str) -> Result<()> {
        let mut users = self.users.lock().await;
        if users
            .values()
            .any(|stored| stored.user.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(ArenaError::Conflict("email already registered".to_string()));
        }
        users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        let users = self.users.lock().await;
        Ok(users
            .values()
            .find(|stored| stored.user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.lock().await.get(&id).map(|s| s.user.clone()))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let users = self.users.lock().await;
        let mut list: Vec<User> = users.values().map(|s| s.user.clone()).collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.email.cmp(&b.email)));
        Ok(list)
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<Option<User>> {
        let mut users = self.users.lock().await;
        Ok(users.get_mut(&id).map(|stored| {
            stored.user.role = role;
            stored.user.updated_at = Utc::now();
            stored.user.clone()
        }))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        let mut users = self.users.lock().await;
        let stored = users
            .get_mut(&id)
            .ok_or_else(|| ArenaError::not_found(format!("user {id}")))?;
        stored.password_hash = password_hash.to_string();
        stored.user.updated_at = Utc::now();
        Ok(())
    }
}

/// Favorites in insertion order; listing returns them newest first.
#[derive(Debug, Default)]
pub struct InMemoryFavoritesRepository {
    rows: Mutex<Vec<Favorite>>,
}

fn same_item(favorite: &Favorite, user_id: Uuid, item_type: &str, item_id: i64) -> bool {
    favorite.user_id == user_id && favorite.item_type == item_type && favorite.item_id == item_id
}

#[async_trait]
impl FavoritesRepository for InMemoryFavoritesRepository {
    async fn list(&self, user_id: Uuid, item_type: Option<&str>) -> Result<Vec<Favorite>> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .rev()
            .filter(|f| f.user_id == user_id)
            .filter(|f| item_type.is_none_or(|tag| f.item_type == tag))
            .cloned()
            .collect())
    }

    async fn add(&self, user_id: Uuid, item_type: &str, item_id: i64) -> Result<(Favorite, bool)> {
        let mut rows = self.rows.lock().await;
        if let Some(existing) = rows.iter().find(|f| same_item(f, user_id, item_type, item_id)) {
            return Ok((existing.clone(), false));
        }
        let favorite = Favorite {
            id: Uuid::new_v4(),
            user_id,
            item_type: item_type.to_string(),
            item_id,
            created_at: Utc::now(),
            item: None,
        };
        rows.push(favorite.clone());
        Ok((favorite, true))
    }

    async fn remove(&self, user_id: Uuid, item_type: &str, item_id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|f| !same_item(f, user_id, item_type, item_id));
        Ok(rows.len() < before)
    }

    async fn exists(&self, user_id: Uuid, item_type: &str, item_id: i64) -> Result<bool> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().any(|f| same_item(f, user_id, item_type, item_id)))
    }

    async fn remove_for_item(&self, item_type: &str, item_id: i64) -> Result<u64> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|f| !(f.item_type == item_type && f.item_id == item_id));
        Ok((before - rows.len()) as u64)
    }
}

/// Health check whose answer the test controls.
#[derive(Debug)]
pub struct StaticHealthCheck {
    healthy: AtomicBool,
}

impl Default for StaticHealthCheck {
    fn default() -> Self {
        Self {
            healthy: AtomicBool::new(true),
        }
    }
}

impl StaticHealthCheck {
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }
}

#[async_trait]
impl HealthCheck for StaticHealthCheck {
    async fn ping(&self) -> Result<()> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ArenaError::Internal("database unreachable".to_string()))
        }
    }
}

/// Handles to every in-memory adapter behind one unit of work.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    pub listings: Arc<InMemoryListingRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub favorites: Arc<InMemoryFavoritesRepository>,
    pub health: Arc<StaticHealthCheck>,
}

impl InMemoryStore {
    pub fn unit_of_work(&self) -> AppUnitOfWork {
        AppUnitOfWork {
            listings: self.listings.clone(),
            users: self.users.clone(),
            favorites: self.favorites.clone(),
            health: self.health.clone(),
        }
    }
}
