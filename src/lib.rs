//! pdrdb - SQL executor for PostgreSQL, MySQL, SQLite and Oracle
//!
//! This is the root crate that re-exports the reusable components.

pub use pdrdb_core::*;
