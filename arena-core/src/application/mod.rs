//! Application services composed over the repository ports.

pub mod accounts;
pub mod favorites;
pub mod listings;
pub mod unit_of_work;

pub use accounts::AccountService;
pub use favorites::FavoritesService;
pub use listings::ListingService;
pub use unit_of_work::{AppUnitOfWork, AppUnitOfWorkBuilder};
