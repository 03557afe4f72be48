//! HTTP API for the ArenaApp back-office and the consumer app.
//!
//! The library half exists so integration tests can build the router over
//! in-memory adapters; `main.rs` wires it to PostgreSQL.

pub mod auth;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
pub use routes::create_app;
