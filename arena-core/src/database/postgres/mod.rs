pub mod favorites;
pub mod listings;
pub mod users;

pub use favorites::PostgresFavoritesRepository;
pub use listings::PostgresListingRepository;
pub use users::PostgresUserRepository;
