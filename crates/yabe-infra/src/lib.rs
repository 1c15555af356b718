//! # Yabe Infrastructure
//!
//! Concrete implementations of the ports defined in `yabe-core`.
//! This crate contains the entity stores and the canned datasets used to seed them.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL entity store via SeaORM

pub mod database;
pub mod fixtures;
pub mod memory;

mod pii;

// Re-exports - In-Memory
pub use fixtures::{BlogFixture, Dataset, FixtureError, LoadedFixture, load_blog, load_fixtures};
pub use memory::InMemoryStore;

// Re-exports - PostgreSQL
pub use database::{DatabaseConfig, DatabaseConnections};
#[cfg(feature = "postgres")]
pub use database::postgres_repositories;
