//! Asmaul husna, dzikir and doa resolvers.

use crate::models::{AsmaulHusna, Doa, Dzikir};
use crate::storage::sqlite::{key, text};
use crate::storage::{SqlValue, Store};
use crate::{Error, Result};
use rusqlite::Row;
use tracing::instrument;

fn asma_from_row(row: &Row<'_>) -> rusqlite::Result<AsmaulHusna> {
    Ok(AsmaulHusna {
        id: key(row, "id")?,
        arab: text(row, "arab")?,
        latin: text(row, "latin")?,
        indo: text(row, "indo")?,
    })
}

pub(crate) fn dzikir_from_row(row: &Row<'_>) -> rusqlite::Result<Dzikir> {
    Ok(Dzikir {
        id: key(row, "id")?,
        title: text(row, "title")?,
        arabic: text(row, "arabic")?,
        translation: text(row, "translation")?,
        kind: text(row, "type")?,
    })
}

pub(crate) fn doa_from_row(row: &Row<'_>) -> rusqlite::Result<Doa> {
    Ok(Doa {
        id: key(row, "id")?,
        title: text(row, "title")?,
        arabic: text(row, "arabic")?,
        translation: text(row, "translation")?,
        category: text(row, "category")?,
    })
}

/// Read operations over the devotional tables.
#[derive(Debug, Clone)]
pub struct DevotionService {
    store: Store,
}

impl DevotionService {
    /// Creates a new devotion service.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Lists the 99 names in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn asma_list(&self) -> Result<Vec<AsmaulHusna>> {
        self.store
            .query_many(
                "asma_list",
                "SELECT * FROM asmaul_husna ORDER BY CAST(id AS INTEGER)",
                vec![],
                asma_from_row,
            )
            .await
    }

    /// Returns one of the 99 names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when missing.
    #[instrument(skip(self))]
    pub async fn asma(&self, id: &str) -> Result<AsmaulHusna> {
        self.store
            .query_one(
                "asma_get",
                "SELECT * FROM asmaul_husna WHERE id = ?1",
                vec![SqlValue::Text(id.to_string())],
                asma_from_row,
            )
            .await?
            .ok_or_else(|| Error::NotFound(format!("asmaul husna {id} not found")))
    }

    /// Lists dzikir, optionally only those of an exact type.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn dzikir(&self, kind: Option<&str>) -> Result<Vec<Dzikir>> {
        match kind {
            Some(kind) => {
                self.store
                    .query_many(
                        "dzikir_by_type",
                        "SELECT * FROM dzikir WHERE type = ?1 ORDER BY CAST(id AS INTEGER)",
                        vec![SqlValue::Text(kind.to_string())],
                        dzikir_from_row,
                    )
                    .await
            },
            None => {
                self.store
                    .query_many(
                        "dzikir_list",
                        "SELECT * FROM dzikir ORDER BY CAST(id AS INTEGER)",
                        vec![],
                        dzikir_from_row,
                    )
                    .await
            },
        }
    }

    /// Lists supplications, optionally only those of an exact category.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn doa_list(&self, category: Option<&str>) -> Result<Vec<Doa>> {
        match category {
            Some(category) => {
                self.store
                    .query_many(
                        "doa_by_category",
                        "SELECT * FROM doa WHERE category = ?1 ORDER BY CAST(id AS INTEGER)",
                        vec![SqlValue::Text(category.to_string())],
                        doa_from_row,
                    )
                    .await
            },
            None => {
                self.store
                    .query_many(
                        "doa_list",
                        "SELECT * FROM doa ORDER BY CAST(id AS INTEGER)",
                        vec![],
                        doa_from_row,
                    )
                    .await
            },
        }
    }

    /// Returns one supplication.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when missing.
    #[instrument(skip(self))]
    pub async fn doa(&self, id: &str) -> Result<Doa> {
        self.store
            .query_one(
                "doa_get",
                "SELECT * FROM doa WHERE id = ?1",
                vec![SqlValue::Text(id.to_string())],
                doa_from_row,
            )
            .await?
            .ok_or_else(|| Error::NotFound(format!("doa {id} not found")))
    }
}
