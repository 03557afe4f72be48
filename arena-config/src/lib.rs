//! Configuration for the ArenaApp server.
//!
//! Values are merged from the process environment (after loading `.env`), an
//! optional `arena.toml`, and built-in defaults, in that order of precedence.
//! The merged [`Config`] is then run through guard rails that reject unsafe
//! production settings and collect warnings for everything else.

pub mod constants;
pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions};
pub use models::{
    AuthConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig,
    ServerConfig, StorageBackend, StorageConfig, TranslationConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
