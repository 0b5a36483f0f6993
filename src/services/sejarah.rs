//! Islamic history resolvers.

use crate::models::{Sejarah, TodayEvents};
use crate::storage::sqlite::{contains_pattern, key, text};
use crate::storage::{SqlValue, Store};
use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};
use rusqlite::Row;
use tracing::instrument;

/// Indonesian month names, January first.
pub const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Maximum number of events returned for a day.
const TODAY_LIMIT: i64 = 10;

fn sejarah_from_row(row: &Row<'_>) -> rusqlite::Result<Sejarah> {
    Ok(Sejarah {
        id: key(row, "id")?,
        kategori: text(row, "kategori")?,
        tahun: text(row, "tahun")?,
        judul: text(row, "judul")?,
        deskripsi: text(row, "deskripsi")?,
    })
}

/// Returns the Indonesian month name of a date.
#[must_use]
pub fn month_name(date: NaiveDate) -> &'static str {
    MONTHS_ID[date.month0() as usize % MONTHS_ID.len()]
}

/// Formats a date as `<day> <Month>`, e.g. `17 Agustus`.
#[must_use]
pub fn day_month_label(date: NaiveDate) -> String {
    format!("{} {}", date.day(), month_name(date))
}

/// History lookups.
#[derive(Debug, Clone)]
pub struct SejarahService {
    store: Store,
}

impl SejarahService {
    /// Creates a new history service.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Lists events, optionally those whose category contains `kategori`
    /// (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn list(&self, kategori: Option<&str>) -> Result<Vec<Sejarah>> {
        match kategori {
            Some(kategori) => {
                self.store
                    .query_many(
                        "sejarah_by_kategori",
                        "SELECT * FROM sejarah WHERE LOWER(kategori) LIKE ?1 ESCAPE '\\' \
                         ORDER BY CAST(id AS INTEGER)",
                        vec![SqlValue::Text(contains_pattern(&kategori.to_lowercase()))],
                        sejarah_from_row,
                    )
                    .await
            },
            None => {
                self.store
                    .query_many(
                        "sejarah_list",
                        "SELECT * FROM sejarah ORDER BY CAST(id AS INTEGER)",
                        vec![],
                        sejarah_from_row,
                    )
                    .await
            },
        }
    }

    /// Returns one event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when missing.
    #[instrument(skip(self))]
    pub async fn detail(&self, id: &str) -> Result<Sejarah> {
        self.store
            .query_one(
                "sejarah_get",
                "SELECT * FROM sejarah WHERE id = ?1",
                vec![SqlValue::Text(id.trim().to_string())],
                sejarah_from_row,
            )
            .await?
            .ok_or_else(|| Error::NotFound(format!("sejarah {id} not found")))
    }

    /// Returns up to ten events matching `date`.
    ///
    /// An event matches when `tahun` contains the day-month label or the
    /// month name, or `deskripsi` contains the day-month label. With no
    /// match, any event mentioning the month in `tahun` or `deskripsi` is
    /// returned instead. Matching is case-insensitive substring search over
    /// free text.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn on_date(&self, date: NaiveDate) -> Result<TodayEvents> {
        let today = day_month_label(date);
        let day_month = contains_pattern(&today.to_lowercase());
        let month = contains_pattern(&month_name(date).to_lowercase());

        let mut events = self
            .store
            .query_many(
                "sejarah_today",
                "SELECT * FROM sejarah \
                 WHERE LOWER(tahun) LIKE ?1 ESCAPE '\\' \
                 OR LOWER(tahun) LIKE ?2 ESCAPE '\\' \
                 OR LOWER(deskripsi) LIKE ?1 ESCAPE '\\' \
                 ORDER BY CAST(id AS INTEGER) LIMIT ?3",
                vec![
                    SqlValue::Text(day_month),
                    SqlValue::Text(month.clone()),
                    SqlValue::Integer(TODAY_LIMIT),
                ],
                sejarah_from_row,
            )
            .await?;

        if events.is_empty() {
            events = self
                .store
                .query_many(
                    "sejarah_month",
                    "SELECT * FROM sejarah \
                     WHERE LOWER(tahun) LIKE ?1 ESCAPE '\\' \
                     OR LOWER(deskripsi) LIKE ?1 ESCAPE '\\' \
                     ORDER BY CAST(id AS INTEGER) LIMIT ?2",
                    vec![SqlValue::Text(month), SqlValue::Integer(TODAY_LIMIT)],
                    sejarah_from_row,
                )
                .await?;
        }

        Ok(TodayEvents { events, today })
    }
}
