//! # muslim-api
//!
//! A REST API serving Islamic reference data: Quran text, translation and
//! tafsir, hadith collections, a mosque directory, historical events and a
//! handful of prayer-related tools.
//!
//! ## Features
//!
//! - Read-mostly resolvers over a single `SQLite` file opened read-only
//! - Bounding-box plus great-circle radius search for nearby mosques
//! - A deterministic SHA-256 integrity chain over the whole Quran corpus
//! - Admin mutation endpoints gated by a shared secret, disabled in production
//! - Thin reshaping proxies for third-party hadith and holiday sources
//!
//! ## Example
//!
//! ```rust,ignore
//! use muslim_api::config::ApiConfig;
//! use muslim_api::services::ServiceContainer;
//!
//! let config = ApiConfig::default().with_database_path("data/alquran.db");
//! let services = ServiceContainer::from_config(&config)?;
//! let chain = services.integrity().chain().await?;
//! println!("{}", chain.root_hash);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod config;
pub mod models;
pub mod observability;
pub mod server;
pub mod services;
pub mod storage;

pub use config::{ApiConfig, Environment};
pub use services::ServiceContainer;
pub use storage::Store;

/// Error type for muslim-api operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When | HTTP |
/// |---------|-------------|------|
/// | `InvalidInput` | Missing or malformed request parameters | 400 |
/// | `NotFound` | An identifier has no matching row | 404 |
/// | `Unauthorized` | Admin call without a valid `x-api-key` | 401 |
/// | `Forbidden` | Admin call while running in production | 403 |
/// | `Upstream` | A proxied third-party API answered with an error | upstream or 502 |
/// | `StoreUnavailable` | The database could not be opened at startup | 500 |
/// | `OperationFailed` | SQL errors, I/O errors, transport failures | 500 |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A mandatory query parameter is missing (e.g. `surahId` for a range)
    /// - A numeric parameter does not parse (latitude, range bounds)
    /// - A search query is too short
    /// - An admin patch carries no updatable field
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Admin authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The operation is disabled in the current environment.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A third-party API answered with a non-success status or error body.
    #[error("upstream error: {message}")]
    Upstream {
        /// Upstream HTTP status, when the upstream reported a failing one.
        status: Option<u16>,
        /// Message relayed from the upstream body, if any.
        message: String,
    },

    /// The database could not be opened at startup.
    ///
    /// Every store call on an unavailable store fails with this variant
    /// instead of aborting the process.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - `SQLite` statements fail to prepare or execute
    /// - A blocking store task panics or is cancelled
    /// - Upstream HTTP transport fails (timeout, DNS, malformed body)
    /// - Configuration files cannot be read or parsed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Builds an [`Error::OperationFailed`] from any displayable cause.
    pub fn operation(operation: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for muslim-api operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::operation("query_many", "no such table: surah");
        assert_eq!(
            err.to_string(),
            "operation 'query_many' failed: no such table: surah"
        );

        let err = Error::Upstream {
            status: Some(404),
            message: "Books not found".to_string(),
        };
        assert_eq!(err.to_string(), "upstream error: Books not found");
    }
}
