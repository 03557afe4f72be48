use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use crate::database::PostgresDatabase;
use crate::database::ports::{
    FavoritesRepository, HealthCheck, ListingRepository, UserRepository,
};

/// Aggregates the repository ports used by application services.
#[derive(Clone)]
pub struct AppUnitOfWork {
    pub listings: Arc<dyn ListingRepository>,
    pub users: Arc<dyn UserRepository>,
    pub favorites: Arc<dyn FavoritesRepository>,
    pub health: Arc<dyn HealthCheck>,
}

impl fmt::Debug for AppUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWork")
            .field("listings", &type_name_of_val(self.listings.as_ref()))
            .field("users", &type_name_of_val(self.users.as_ref()))
            .field("favorites", &type_name_of_val(self.favorites.as_ref()))
            .field("health", &type_name_of_val(self.health.as_ref()))
            .finish()
    }
}

impl AppUnitOfWork {
    pub fn from_postgres(postgres: Arc<PostgresDatabase>) -> Self {
        Self {
            listings: Arc::new(postgres.listings()),
            users: Arc::new(postgres.users()),
            favorites: Arc::new(postgres.favorites()),
            health: postgres,
        }
    }

    pub fn builder() -> AppUnitOfWorkBuilder {
        AppUnitOfWorkBuilder::default()
    }
}

#[derive(Default)]
pub struct AppUnitOfWorkBuilder {
    listings: Option<Arc<dyn ListingRepository>>,
    users: Option<Arc<dyn UserRepository>>,
    favorites: Option<Arc<dyn FavoritesRepository>>,
    health: Option<Arc<dyn HealthCheck>>,
}

impl fmt::Debug for AppUnitOfWorkBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWorkBuilder")
            .field("listings", &self.listings.is_some())
            .field("users", &self.users.is_some())
            .field("favorites", &self.favorites.is_some())
            .field("health", &self.health.is_some())
            .finish()
    }
}

impl AppUnitOfWorkBuilder {
    pub fn listings(mut self, repo: Arc<dyn ListingRepository>) -> Self {
        self.listings = Some(repo);
        self
    }

    pub fn users(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.users = Some(repo);
        self
    }

    pub fn favorites(mut self, repo: Arc<dyn FavoritesRepository>) -> Self {
        self.favorites = Some(repo);
        self
    }

    pub fn health(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health = Some(check);
        self
    }

    pub fn build(self) -> Result<AppUnitOfWork, String> {
        Ok(AppUnitOfWork {
            listings: self.listings.ok_or("listings repository missing")?,
            users: self.users.ok_or("users repository missing")?,
            favorites: self.favorites.ok_or("favorites repository missing")?,
            health: self.health.ok_or("health check missing")?,
        })
    }
}
