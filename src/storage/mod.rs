//! Storage layer.
//!
//! A single `SQLite` file holds every entity. [`Store`] exposes three
//! primitives (`query_many`, `query_one`, `execute`); the resolvers in
//! [`crate::services`] build parameterized SQL on top of them.

pub mod migrations;
pub mod sqlite;
mod store;

pub use migrations::{MIGRATIONS, Migration, MigrationRunner};
pub use rusqlite::types::Value as SqlValue;
pub use store::Store;
