//! # Arena Core
//!
//! Domain library for ArenaApp, the city-guide back-office and consumer API.
//!
//! ## Overview
//!
//! - **Catalog**: the seven listing tables, their column schema, payload
//!   validation and locale fallback ([`catalog`])
//! - **Persistence**: repository ports with PostgreSQL adapters and the
//!   embedded migrations ([`database`], [`MIGRATOR`])
//! - **Auth**: Argon2id password hashing and HS256 access tokens ([`auth`])
//! - **Storage**: image inspection and local or HTTP object storage ([`storage`])
//! - **Translation**: LLM-backed filling of `_en` / `_pt` columns ([`translation`])
//! - **Application services**: listings, favorites and accounts ([`application`])
//!
//! ## Feature Flags
//!
//! - `test-support`: in-memory repositories and mock clients for tests
//! - `postgres-tests`: integration tests against a live database

pub mod application;
pub mod auth;
pub mod catalog;
pub mod database;
pub mod error;
pub mod storage;
pub mod translation;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{ArenaError, Result};

/// Schema migrations for every table the service owns.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
