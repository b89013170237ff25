//! # Campus Infrastructure
//!
//! Concrete implementations of the ports defined in `campus-core`.
//! This crate contains the database repositories and the auth services.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM; without
//!   it only the in-memory repositories are available.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::InMemoryStore;

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;
