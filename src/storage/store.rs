//! The data store adapter.

use super::sqlite::{
    acquire_lock, open_read_connection, open_write_connection, record_operation_metrics,
    status_label,
};
use crate::config::DatabaseConfig;
use crate::{Error, Result};
use rusqlite::types::Value;
use rusqlite::{Connection, Row, params_from_iter};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

const BACKEND: &str = "sqlite";

/// Handle to the `SQLite` database.
///
/// Cloning is cheap; clones share the connection pool. A store whose file
/// could not be opened at startup is *unavailable*: it is still a valid
/// value, but every call fails with [`Error::StoreUnavailable`].
#[derive(Clone)]
pub struct Store {
    state: Arc<StoreState>,
}

enum StoreState {
    Ready(Arc<ReadPool>),
    Unavailable(String),
}

/// Idle read connections plus what is needed to open more.
///
/// The mutex guards only the idle list; it is released before a query runs.
struct ReadPool {
    path: PathBuf,
    cache_size_kib: u32,
    max_idle: usize,
    idle: Mutex<Vec<Connection>>,
}

impl ReadPool {
    fn checkout(&self) -> Result<Connection> {
        let pooled = acquire_lock(&self.idle).pop();
        match pooled {
            Some(conn) => Ok(conn),
            None => open_read_connection(&self.path, self.cache_size_kib),
        }
    }

    fn checkin(&self, conn: Connection) {
        let mut idle = acquire_lock(&self.idle);
        if idle.len() < self.max_idle {
            idle.push(conn);
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.state.as_ref() {
            StoreState::Ready(pool) => f
                .debug_struct("Store")
                .field("path", &pool.path)
                .field("idle", &acquire_lock(&pool.idle).len())
                .finish(),
            StoreState::Unavailable(reason) => f
                .debug_struct("Store")
                .field("unavailable", reason)
                .finish(),
        }
    }
}

impl Store {
    /// Opens the database described by `config`.
    ///
    /// Never fails: when the file cannot be opened the cause is logged and an
    /// unavailable store is returned.
    #[must_use]
    pub fn open(config: &DatabaseConfig) -> Self {
        match open_read_connection(&config.path, config.cache_size_kib) {
            Ok(conn) => {
                tracing::info!(path = %config.path.display(), "Database opened");
                let pool = ReadPool {
                    path: config.path.clone(),
                    cache_size_kib: config.cache_size_kib,
                    max_idle: config.max_idle_connections.max(1),
                    idle: Mutex::new(vec![conn]),
                };
                Self {
                    state: Arc::new(StoreState::Ready(Arc::new(pool))),
                }
            },
            Err(e) => {
                tracing::error!(path = %config.path.display(), error = %e, "Failed to open database");
                Self::unavailable(format!("{}: {e}", config.path.display()))
            },
        }
    }

    /// Returns a store that rejects every call with `reason`.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: Arc::new(StoreState::Unavailable(reason.into())),
        }
    }

    /// Returns true when the database was opened successfully.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self.state.as_ref(), StoreState::Ready(_))
    }

    /// Returns the database path, if available.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self.state.as_ref() {
            StoreState::Ready(pool) => Some(&pool.path),
            StoreState::Unavailable(_) => None,
        }
    }

    fn pool(&self) -> Result<Arc<ReadPool>> {
        match self.state.as_ref() {
            StoreState::Ready(pool) => Ok(Arc::clone(pool)),
            StoreState::Unavailable(reason) => Err(Error::StoreUnavailable(reason.clone())),
        }
    }

    /// Runs `f` against a pooled read connection on the blocking pool.
    async fn with_read<T, F>(&self, operation: &'static str, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let pool = self.pool()?;
        let start = Instant::now();

        let result = tokio::task::spawn_blocking(move || {
            let conn = pool.checkout()?;
            let outcome = f(&conn).map_err(|e| Error::operation(operation, e));
            pool.checkin(conn);
            outcome
        })
        .await
        .map_err(|e| Error::operation(operation, e))
        .and_then(|inner| inner);

        record_operation_metrics(BACKEND, operation, start, status_label(&result));
        if let Err(e) = &result {
            tracing::warn!(operation, error = %e, "Store query failed");
        }
        result
    }

    /// Runs a query and maps every row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] for an unavailable store and
    /// [`Error::OperationFailed`] when the statement or a row mapping fails.
    pub async fn query_many<T, F>(
        &self,
        operation: &'static str,
        sql: impl Into<String>,
        params: Vec<Value>,
        map: F,
    ) -> Result<Vec<T>>
    where
        T: Send + 'static,
        F: Fn(&Row<'_>) -> rusqlite::Result<T> + Send + 'static,
    {
        let sql = sql.into();
        self.with_read(operation, move |conn| {
            let mut stmt = conn.prepare_cached(&sql)?;
            let rows = stmt.query_map(params_from_iter(params.iter()), |row| map(row))?;
            rows.collect()
        })
        .await
    }

    /// Runs a query and maps the first row, if any.
    ///
    /// # Errors
    ///
    /// Same as [`Store::query_many`].
    pub async fn query_one<T, F>(
        &self,
        operation: &'static str,
        sql: impl Into<String>,
        params: Vec<Value>,
        map: F,
    ) -> Result<Option<T>>
    where
        T: Send + 'static,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T> + Send + 'static,
    {
        let sql = sql.into();
        self.with_read(operation, move |conn| {
            let mut stmt = conn.prepare_cached(&sql)?;
            let mut rows = stmt.query(params_from_iter(params.iter()))?;
            rows.next()?.map(map).transpose()
        })
        .await
    }

    /// Executes a write statement on a read-write connection.
    ///
    /// Returns the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] for an unavailable store and
    /// [`Error::OperationFailed`] when the file cannot be opened for writing
    /// or the statement fails.
    pub async fn execute(
        &self,
        operation: &'static str,
        sql: impl Into<String>,
        params: Vec<Value>,
    ) -> Result<usize> {
        let path = self.pool()?.path.clone();
        let sql = sql.into();
        let start = Instant::now();

        let result = tokio::task::spawn_blocking(move || {
            let conn = open_write_connection(&path)?;
            conn.execute(&sql, params_from_iter(params.iter()))
                .map_err(|e| Error::operation(operation, e))
        })
        .await
        .map_err(|e| Error::operation(operation, e))
        .and_then(|inner| inner);

        record_operation_metrics(BACKEND, operation, start, status_label(&result));
        result
    }
}
