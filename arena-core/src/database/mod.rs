//! Persistence: repository ports and the PostgreSQL adapter.

pub mod ports;
pub mod postgres;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

use crate::MIGRATOR;
use crate::error::Result;
use ports::HealthCheck;
use postgres::{
    PostgresFavoritesRepository, PostgresListingRepository,
    PostgresUserRepository,
};

/// Connection pool plus the repositories built on it.
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    max_connections: u32,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl PostgresDatabase {
    pub async fn connect(
        connection_string: &str,
        max_connections: u32,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(connection_string)
            .await?;

        info!(max_connections, "connected to PostgreSQL");
        Ok(Self {
            pool,
            max_connections,
        })
    }

    /// Wrap an existing pool, e.g. one handed out by `#[sqlx::test]`.
    pub fn from_pool(pool: PgPool) -> Self {
        let max_connections = pool.options().get_max_connections();
        Self {
            pool,
            max_connections,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the embedded migrations.
    pub async fn initialize_schema(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await?;
        info!("database migrations applied");
        Ok(())
    }

    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub fn listings(&self) -> PostgresListingRepository {
        PostgresListingRepository::new(self.pool.clone())
    }

    pub fn users(&self) -> PostgresUserRepository {
        PostgresUserRepository::new(self.pool.clone())
    }

    pub fn favorites(&self) -> PostgresFavoritesRepository {
        PostgresFavoritesRepository::new(self.pool.clone())
    }
}

#[async_trait]
impl HealthCheck for PostgresDatabase {
    async fn ping(&self) -> Result<()> {
        PostgresDatabase::ping(self).await
    }
}
