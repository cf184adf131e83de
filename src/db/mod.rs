//! Database layer
//!
//! Persistence for the Fleettrack backend. Supports:
//! - SQLite (default, for single-binary deployment and tests)
//! - PostgreSQL (for hosted deployments)
//!
//! The driver is selected from configuration; repositories work against
//! the `DatabasePool` trait object and never know the concrete backend.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, PostgresDatabase,
    SqliteDatabase,
};
