use async_trait::async_trait;
use arena_model::Page;
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder, query_builder::Separated};
use tracing::{debug, info};

use crate::catalog::{
    EntityKind, FieldValue, Listing, ListingFields, ListingQuery, WritableColumn,
};
use crate::database::ports::ListingRepository;
use crate::error::{ArenaError, Result};

/// PostgreSQL-backed implementation of the `ListingRepository` port.
///
/// Rows are read back with `to_jsonb(t)` so one code path serves all seven
/// tables. Table and column names come from the static catalog schema.
#[derive(Clone, Debug)]
pub struct PostgresListingRepository {
    pool: PgPool,
}

impl PostgresListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn push_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    kind: EntityKind,
    query: &ListingQuery,
) {
    builder.push(" WHERE TRUE");

    if !query.include_inactive() {
        builder.push(" AND t.activo");
    }

    if let Some(pattern) = query.like_pattern() {
        builder
            .push(" AND (t.nombre ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR t.descripcion ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(zona) = query.zona() {
        builder
            .push(" AND LOWER(t.zona) = LOWER(")
            .push_bind(zona.to_string())
            .push(")");
    }

    if let Some(destacado) = query.destacado {
        builder.push(" AND t.destacado = ").push_bind(destacado);
    }

    if kind.is_dated() && query.upcoming() {
        builder.push(" AND COALESCE(t.fecha_fin, t.fecha_inicio) >= CURRENT_DATE");
    }
}

fn order_clause(kind: EntityKind) -> &'static str {
    if kind.is_dated() {
        " ORDER BY t.fecha_inicio ASC, t.nombre ASC, t.id ASC"
    } else {
        " ORDER BY t.destacado DESC, t.nombre ASC, t.id ASC"
    }
}

fn bind_value(sep: &mut Separated<'_, '_, Postgres, &'static str>, value: &FieldValue) {
    match value {
        FieldValue::Text(v) => sep.push_bind_unseparated(v.clone()),
        FieldValue::TextList(v) => sep.push_bind_unseparated(v.clone()),
        FieldValue::Integer(v) => sep.push_bind_unseparated(*v),
        FieldValue::Float(v) => sep.push_bind_unseparated(*v),
        FieldValue::Boolean(v) => sep.push_bind_unseparated(*v),
        FieldValue::Date(v) => sep.push_bind_unseparated(*v),
    };
}

fn rows_to_listings(kind: EntityKind, rows: Vec<Value>) -> Result<Vec<Listing>> {
    rows.into_iter()
        .map(|row| Listing::from_row(kind, row))
        .collect()
}

#[async_trait]
impl ListingRepository for PostgresListingRepository {
    async fn list(
        &self,
        kind: EntityKind,
        query: &ListingQuery,
    ) -> Result<Page<Listing>> {
        let table = kind.table();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ");
        count.push(table).push(" t");
        push_filters(&mut count, kind, query);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(self.pool())
            .await?;

        let mut select =
            QueryBuilder::<Postgres>::new("SELECT to_jsonb(t) AS data FROM ");
        select.push(table).push(" t");
        push_filters(&mut select, kind, query);
        select
            .push(order_clause(kind))
            .push(" LIMIT ")
            .push_bind(i64::from(query.per_page()))
            .push(" OFFSET ")
            .push_bind(query.offset());

        let rows: Vec<Value> = select
            .build_query_scalar()
            .fetch_all(self.pool())
            .await?;

        debug!(entity = %kind, total, returned = rows.len(), "listed rows");

        Ok(Page::new(
            rows_to_listings(kind, rows)?,
            query.page(),
            query.per_page(),
            u64::try_from(total).unwrap_or_default(),
        ))
    }

    async fn get(
        &self,
        kind: EntityKind,
        id: i64,
        include_inactive: bool,
    ) -> Result<Option<Listing>> {
        let mut select =
            QueryBuilder::<Postgres>::new("SELECT to_jsonb(t) AS data FROM ");
        select
            .push(kind.table())
            .push(" t WHERE t.id = ")
            .push_bind(id);
        if !include_inactive {
            select.push(" AND t.activo");
        }

        let row: Option<Value> = select
            .build_query_scalar()
            .fetch_optional(self.pool())
            .await?;

        row.map(|row| Listing::from_row(kind, row)).transpose()
    }

    async fn create(&self, fields: &ListingFields) -> Result<Listing> {
        let kind = fields.kind();
        let mut insert = QueryBuilder::<Postgres>::new("INSERT INTO ");
        insert.push(kind.table()).push(" AS t (");

        {
            let mut columns = insert.separated(", ");
            for (column, _) in fields.iter() {
                columns.push(column);
            }
        }

        insert.push(") VALUES (");
        {
            let mut values = insert.separated(", ");
            for (_, value) in fields.iter() {
                values.push("");
                bind_value(&mut values, value);
            }
        }
        insert.push(") RETURNING to_jsonb(t) AS data");

        let row: Value = insert
            .build_query_scalar()
            .fetch_one(self.pool())
            .await?;
        let listing = Listing::from_row(kind, row)?;

        info!(entity = %kind, id = listing.id, "created listing");
        Ok(listing)
    }

    async fn update(
        &self,
        id: i64,
        fields: &ListingFields,
    ) -> Result<Option<Listing>> {
        let kind = fields.kind();
        let mut update = QueryBuilder::<Postgres>::new("UPDATE ");
        update.push(kind.table()).push(" AS t SET ");

        {
            let mut assignments = update.separated(", ");
            for (column, value) in fields.iter() {
                assignments.push(column);
                assignments.push_unseparated(" = ");
                bind_value(&mut assignments, value);
            }
            assignments.push("updated_at = NOW()");
        }

        update
            .push(" WHERE t.id = ")
            .push_bind(id)
            .push(" RETURNING to_jsonb(t) AS data");

        let row: Option<Value> = update
            .build_query_scalar()
            .fetch_optional(self.pool())
            .await?;

        let listing = row.map(|row| Listing::from_row(kind, row)).transpose()?;
        if listing.is_some() {
            info!(entity = %kind, id, fields = fields.len(), "updated listing");
        }
        Ok(listing)
    }

    async fn delete(&self, kind: EntityKind, id: i64) -> Result<bool> {
        let mut delete = QueryBuilder::<Postgres>::new("DELETE FROM ");
        delete.push(kind.table()).push(" WHERE id = ").push_bind(id);

        let result = delete.build().execute(self.pool()).await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(entity = %kind, id, "deleted listing");
        }
        Ok(deleted)
    }

    async fn write_translations(
        &self,
        kind: EntityKind,
        id: i64,
        columns: &[(String, String)],
    ) -> Result<bool> {
        let schema = kind.schema();
        let mut update = QueryBuilder::<Postgres>::new("UPDATE ");
        update.push(kind.table()).push(" SET ");

        {
            let mut assignments = update.separated(", ");
            for (column, text) in columns {
                if !matches!(
                    schema.writable(column),
                    Some(WritableColumn::Companion { .. })
                ) {
                    return Err(ArenaError::invalid(format!(
                        "'{column}' is not a translation column of {kind}"
                    )));
                }
                assignments.push(column.as_str());
                assignments.push_unseparated(" = ");
                assignments.push_bind_unseparated(text.clone());
            }
            assignments.push("traducido_at = NOW()");
        }

        update.push(" WHERE id = ").push_bind(id);

        let result = update.build().execute(self.pool()).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn pending_translation(
        &self,
        kind: EntityKind,
        limit: u32,
    ) -> Result<Vec<i64>> {
        let mut select = QueryBuilder::<Postgres>::new("SELECT id FROM ");
        select
            .push(kind.table())
            .push(
                " WHERE traducido_at IS NULL OR traducido_at < updated_at \
                 ORDER BY updated_at ASC LIMIT ",
            )
            .push_bind(i64::from(limit));

        let ids: Vec<i64> = select
            .build_query_scalar()
            .fetch_all(self.pool())
            .await?;
        Ok(ids)
    }
}
