//! Postgres pool factory and migration runner for bookshelf.
//!
//! - `connect`: builds the shared `PgPool` from `DatabaseSettings`.
//! - `run_migrations`: applies module-contributed migrations exactly once.

pub mod connection;
pub mod error;
pub mod migrate;

pub use connection::{connect, connect_url};
pub use error::DbError;
pub use migrate::run_migrations;
