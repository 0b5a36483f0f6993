//! Shared `SQLite` infrastructure for the store.
//!
//! ## Module Structure
//!
//! - [`connection`]: connection opening, pragma tuning, lock acquisition and
//!   the `distance_km` SQL function
//! - [`sql`]: LIKE escaping and the [`QueryParts`] clause builder
//! - [`rows`]: tolerant column accessors for row shaping
//! - [`metrics`]: store operation metrics

mod connection;
mod metrics;
mod rows;
mod sql;

pub use connection::{
    BUSY_TIMEOUT_MS, acquire_lock, configure_read_connection, open_read_connection,
    open_write_connection, register_functions,
};
pub use metrics::{record_operation_metrics, status_label};
pub use rows::{decode_json_map, json_map, key, real, text};
pub use sql::{QueryParts, contains_pattern, escape_like_wildcards};
