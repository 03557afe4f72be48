//! Repository ports. Application services depend on these traits; the
//! PostgreSQL adapters live in [`crate::database::postgres`].

pub mod favorites;
pub mod health;
pub mod listings;
pub mod users;

pub use favorites::FavoritesRepository;
pub use health::HealthCheck;
pub use listings::ListingRepository;
pub use users::{StoredUser, UserRepository};
