//! Connection handling for the `SQLite` store.
//!
//! Read connections are opened read-only and tuned for a read-mostly
//! workload. Writes go through a separate read-write connection.

use crate::services::geo::distance_km;
use crate::{Error, Result};
use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Busy timeout applied to every connection, in milliseconds.
pub const BUSY_TIMEOUT_MS: u32 = 5000;

/// Helper to acquire mutex lock with poison recovery.
///
/// If the mutex is poisoned (due to a panic in a previous critical section),
/// we recover the inner value and log a warning. The guarded data here is a
/// list of idle connections, which stays valid after a panic elsewhere.
pub fn acquire_lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("SQLite pool mutex was poisoned, recovering");
            metrics::counter!("sqlite_mutex_poison_recovery_total").increment(1);
            poisoned.into_inner()
        },
    }
}

/// Opens a read-only connection and applies the read pragmas.
///
/// The file must already exist; a missing file is an error rather than an
/// empty database.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the file cannot be opened or
/// configured.
pub fn open_read_connection(path: &Path, cache_size_kib: u32) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
        | OpenFlags::SQLITE_OPEN_URI;
    let conn = Connection::open_with_flags(path, flags)
        .map_err(|e| Error::operation("open_read_connection", e))?;
    configure_read_connection(&conn, cache_size_kib)?;
    register_functions(&conn)?;
    Ok(conn)
}

/// Opens a read-write connection for admin updates.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the file cannot be opened.
pub fn open_write_connection(path: &Path) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(path, flags)
        .map_err(|e| Error::operation("open_write_connection", e))?;
    conn.pragma_update(None, "busy_timeout", BUSY_TIMEOUT_MS)
        .map_err(|e| Error::operation("configure_write_connection", e))?;
    Ok(conn)
}

/// Configures a read connection.
///
/// # Configuration Applied
///
/// - **`query_only`**: rejects any statement that would modify the file
/// - **`temp_store = MEMORY`**: sorts and temporary b-trees stay in memory
/// - **`cache_size`**: page cache of `cache_size_kib` KiB (negative form)
/// - **`busy_timeout`**: waits up to 5 seconds while an admin write holds the lock
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if a pragma cannot be applied.
pub fn configure_read_connection(conn: &Connection, cache_size_kib: u32) -> Result<()> {
    let cache_size = -i64::from(cache_size_kib);
    conn.pragma_update(None, "query_only", "ON")
        .and_then(|()| conn.pragma_update(None, "temp_store", "MEMORY"))
        .and_then(|()| conn.pragma_update(None, "cache_size", cache_size))
        .and_then(|()| conn.pragma_update(None, "busy_timeout", BUSY_TIMEOUT_MS))
        .map_err(|e| Error::operation("configure_read_connection", e))
}

/// Registers the scalar SQL functions used by the resolvers.
///
/// `distance_km(lat1, lng1, lat2, lng2)` returns the great-circle distance in
/// kilometres, or `NULL` when any argument is not numeric.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if registration fails.
pub fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "distance_km",
        4,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let coords = (
                numeric_arg(ctx, 0),
                numeric_arg(ctx, 1),
                numeric_arg(ctx, 2),
                numeric_arg(ctx, 3),
            );
            Ok(match coords {
                (Some(lat1), Some(lng1), Some(lat2), Some(lng2)) => {
                    Some(distance_km(lat1, lng1, lat2, lng2))
                },
                _ => None,
            })
        },
    )
    .map_err(|e| Error::operation("register_functions", e))
}

/// Coerces an argument to `f64`. Coordinates may be stored as text.
fn numeric_arg(ctx: &Context<'_>, idx: usize) -> Option<f64> {
    match ctx.get_raw(idx) {
        #[allow(clippy::cast_precision_loss)]
        ValueRef::Integer(i) => Some(i as f64),
        ValueRef::Real(f) => Some(f),
        ValueRef::Text(t) => std::str::from_utf8(t).ok()?.trim().parse().ok(),
        ValueRef::Null | ValueRef::Blob(_) => None,
    }
    .filter(|v: &f64| v.is_finite())
}
