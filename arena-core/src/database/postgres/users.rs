use async_trait::async_trait;
use arena_model::{Role, User};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::database::ports::{StoredUser, UserRepository};
use crate::error::{ArenaError, Result};

/// PostgreSQL-backed implementation of the `UserRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    nombre: String,
    role: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<StoredUser> {
        let role = self.role.parse::<Role>().map_err(|e| {
            ArenaError::Internal(format!("user {} has {e}", self.id))
        })?;
        Ok(StoredUser {
            user: User {
                id: self.id,
                email: self.email,
                nombre: self.nombre,
                role,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            password_hash: self.password_hash,
        })
    }
}

const USER_COLUMNS: &str =
    "id, email, nombre, role, password_hash, created_at, updated_at";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, user: &User, password_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO usuarios (id, email, nombre, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.nombre)
        .bind(password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool())
        .await
        .map_err(|e| match ArenaError::from(e) {
            ArenaError::Conflict(_) => {
                ArenaError::Conflict("email already registered".to_string())
            }
            other => other,
        })?;

        info!(user_id = %user.id, role = %user.role, "created user");
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM usuarios WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM usuarios WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row
            .map(UserRow::into_user)
            .transpose()?
            .map(|stored| stored.user))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM usuarios ORDER BY created_at ASC"
        ))
        .fetch_all(self.pool())
        .await?;

        rows.into_iter()
            .map(|row| row.into_user().map(|stored| stored.user))
            .collect()
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "UPDATE usuarios SET role = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(self.pool())
        .await?;

        if row.is_some() {
            info!(user_id = %id, %role, "changed user role");
        }
        Ok(row
            .map(UserRow::into_user)
            .transpose()?
            .map(|stored| stored.user))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE usuarios SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(ArenaError::not_found(format!("user {id}")));
        }
        Ok(())
    }
}
