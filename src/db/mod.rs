//! Database layer
//!
//! This module provides database abstraction for the Folio portfolio system.
//! It supports:
//! - SQLite (default, for single-binary deployment)
//! - MySQL (for hosted deployments)
//!
//! The database driver is selected based on configuration.
//!
//! # Architecture
//!
//! The database layer uses a trait-based abstraction (`DatabasePool`) that
//! allows the application to work with either SQLite or MySQL without
//! knowing the specific backend. Repositories dispatch on
//! `DatabasePool::driver()` and use the concrete pool for their queries.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
