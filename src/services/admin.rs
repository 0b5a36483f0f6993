//! Admin edits of verse, dzikir and doa text.
//!
//! Every update reads the row first, issues a single `UPDATE` setting only
//! the supplied non-blank fields, and reads the row back for the diff.

use crate::models::{AyahFields, AyahPatch, Diff, KeyValue, TextFields, TextPatch};
use crate::storage::sqlite::{QueryParts, text};
use crate::storage::{SqlValue, Store};
use crate::{Error, Result};
use rusqlite::Row;
use tracing::instrument;

/// Tables holding [`TextFields`] rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTable {
    Dzikir,
    Doa,
}

impl TextTable {
    const fn name(self) -> &'static str {
        match self {
            Self::Dzikir => "dzikir",
            Self::Doa => "doa",
        }
    }
}

fn required_key(value: Option<&KeyValue>) -> Option<String> {
    value.and_then(KeyValue::as_key)
}

/// Returns the field when it carries non-whitespace text.
fn supplied(value: Option<&String>) -> Option<&String> {
    value.filter(|v| !v.trim().is_empty())
}

fn ayah_fields_from_row(row: &Row<'_>) -> rusqlite::Result<AyahFields> {
    Ok(AyahFields {
        arab: text(row, "arab")?,
        text: text(row, "text")?,
        latin: text(row, "latin")?,
    })
}

fn text_fields_from_row(row: &Row<'_>) -> rusqlite::Result<TextFields> {
    Ok(TextFields {
        title: text(row, "title")?,
        arabic: text(row, "arabic")?,
        translation: text(row, "translation")?,
    })
}

fn ayah_assignments(patch: &AyahPatch) -> QueryParts {
    let mut parts = QueryParts::new();
    if let Some(arab) = supplied(patch.arab.as_ref()) {
        parts.assign("arab", arab.clone());
    }
    if let Some(text) = supplied(patch.text.as_ref()) {
        parts.assign("text", text.clone());
    }
    if let Some(latin) = supplied(patch.latin.as_ref()) {
        parts.assign("latin", latin.clone());
    }
    parts
}

fn text_assignments(patch: &TextPatch) -> QueryParts {
    let mut parts = QueryParts::new();
    if let Some(title) = supplied(patch.title.as_ref()) {
        parts.assign("title", title.clone());
    }
    if let Some(arabic) = supplied(patch.arabic.as_ref()) {
        parts.assign("arabic", arabic.clone());
    }
    if let Some(translation) = supplied(patch.translation.as_ref()) {
        parts.assign("translation", translation.clone());
    }
    parts
}

/// Writes through the store's read-write connection.
#[derive(Debug, Clone)]
pub struct AdminService {
    store: Store,
}

impl AdminService {
    /// Creates a new admin service.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Updates the text of one verse.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when a key is missing or no field is
    /// supplied, [`Error::NotFound`] when the verse does not exist, or a
    /// store error. No `UPDATE` is issued in the first two cases.
    #[instrument(skip(self, patch))]
    pub async fn update_ayah(&self, patch: &AyahPatch) -> Result<Diff<AyahFields>> {
        let (Some(surah), Some(ayah)) = (
            required_key(patch.surah_id.as_ref()),
            required_key(patch.ayah_id.as_ref()),
        ) else {
            return Err(Error::InvalidInput(
                "surahId and ayahId are required".to_string(),
            ));
        };

        let before = self
            .read_ayah(&surah, &ayah)
            .await?
            .ok_or_else(|| Error::NotFound(format!("ayah {ayah} of surah {surah} not found")))?;

        let mut parts = ayah_assignments(patch);
        if !parts.has_assignments() {
            return Err(Error::InvalidInput("nothing to update".to_string()));
        }
        let surah_ph = parts.bind(surah.clone());
        let ayah_ph = parts.bind(ayah.clone());
        let sql = format!(
            "UPDATE ayah SET {} WHERE surah = {surah_ph} AND ayah = {ayah_ph}",
            parts.set_clause()
        );
        self.store.execute("admin_update_ayah", sql, parts.into_params()).await?;

        let after = self
            .read_ayah(&surah, &ayah)
            .await?
            .ok_or_else(|| Error::NotFound(format!("ayah {ayah} of surah {surah} not found")))?;

        tracing::info!(surah = %surah, ayah = %ayah, "Updated ayah");
        Ok(Diff { before, after })
    }

    /// Updates one dzikir.
    ///
    /// # Errors
    ///
    /// Same as [`AdminService::update_ayah`], keyed by `id`.
    #[instrument(skip(self, patch))]
    pub async fn update_dzikir(&self, patch: &TextPatch) -> Result<Diff<TextFields>> {
        self.update_text(TextTable::Dzikir, patch).await
    }

    /// Updates one doa.
    ///
    /// # Errors
    ///
    /// Same as [`AdminService::update_ayah`], keyed by `id`.
    #[instrument(skip(self, patch))]
    pub async fn update_doa(&self, patch: &TextPatch) -> Result<Diff<TextFields>> {
        self.update_text(TextTable::Doa, patch).await
    }

    async fn update_text(&self, table: TextTable, patch: &TextPatch) -> Result<Diff<TextFields>> {
        let Some(id) = required_key(patch.id.as_ref()) else {
            return Err(Error::InvalidInput("id is required".to_string()));
        };

        let before = self
            .read_text(table, &id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("{} {id} not found", table.name())))?;

        let mut parts = text_assignments(patch);
        if !parts.has_assignments() {
            return Err(Error::InvalidInput("nothing to update".to_string()));
        }
        let id_ph = parts.bind(id.clone());
        let sql = format!(
            "UPDATE {} SET {} WHERE id = {id_ph}",
            table.name(),
            parts.set_clause()
        );
        let operation = match table {
            TextTable::Dzikir => "admin_update_dzikir",
            TextTable::Doa => "admin_update_doa",
        };
        self.store.execute(operation, sql, parts.into_params()).await?;

        let after = self
            .read_text(table, &id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("{} {id} not found", table.name())))?;

        tracing::info!(table = table.name(), id = %id, "Updated record");
        Ok(Diff { before, after })
    }

    async fn read_ayah(&self, surah: &str, ayah: &str) -> Result<Option<AyahFields>> {
        self.store
            .query_one(
                "admin_read_ayah",
                "SELECT arab, text, latin FROM ayah WHERE surah = ?1 AND ayah = ?2",
                vec![
                    SqlValue::Text(surah.to_string()),
                    SqlValue::Text(ayah.to_string()),
                ],
                ayah_fields_from_row,
            )
            .await
    }

    async fn read_text(&self, table: TextTable, id: &str) -> Result<Option<TextFields>> {
        let (operation, sql) = match table {
            TextTable::Dzikir => (
                "admin_read_dzikir",
                "SELECT title, arabic, translation FROM dzikir WHERE id = ?1",
            ),
            TextTable::Doa => (
                "admin_read_doa",
                "SELECT title, arabic, translation FROM doa WHERE id = ?1",
            ),
        };
        self.store
            .query_one(
                operation,
                sql,
                vec![SqlValue::Text(id.to_string())],
                text_fields_from_row,
            )
            .await
    }
}
