//! Wire models shared between the ArenaApp server and its clients.
//!
//! Everything here is plain data: request payloads, response envelopes and the
//! small enums (`Role`, `Locale`) both sides need to agree on.

pub mod auth;
pub mod favorites;
pub mod locale;
pub mod page;
pub mod responses;
pub mod routes;
pub mod translation;
pub mod uploads;

pub use auth::{
    AuthResponse, LoginRequest, RegisterRequest, Role, RoleParseError,
    UpdateRoleRequest, User,
};
pub use favorites::{Favorite, FavoriteRequest, FavoriteStatus};
pub use locale::Locale;
pub use page::Page;
pub use responses::ApiResponse;
pub use translation::{BackfillSummary, TranslationOutcome};
pub use uploads::UploadResponse;
