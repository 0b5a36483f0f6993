//! Quran resolvers: surah, ayah, tafsir, theme, asbab al-nuzul and recitations.

use crate::models::{
    AsbabNuzul, Ayah, MurotalEntry, MurotalPlaylist, Qari, Surah, Tafsir, Theme,
};
use crate::storage::sqlite::{contains_pattern, json_map, key, text};
use crate::storage::{SqlValue, Store};
use crate::{Error, Result};
use rusqlite::Row;
use tracing::instrument;

/// Reciter used when a murotal request names none.
pub const DEFAULT_QARI_ID: &str = "05";

/// Minimum verse search query length (exclusive).
const MIN_FIND_QUERY_CHARS: usize = 3;

pub(crate) fn surah_from_row(row: &Row<'_>) -> rusqlite::Result<Surah> {
    Ok(Surah {
        number: key(row, "number")?,
        sequence: text(row, "sequence")?,
        number_of_verses: text(row, "number_of_verses")?,
        name_short: text(row, "name_short")?,
        name_long: text(row, "name_long")?,
        name_en: text(row, "name_en")?,
        name_id: text(row, "name_id")?,
        translation_en: text(row, "translation_en")?,
        translation_id: text(row, "translation_id")?,
        revelation: text(row, "revelation")?,
        revelation_en: text(row, "revelation_en")?,
        revelation_id: text(row, "revelation_id")?,
        audio_full: json_map(row, "audio_full")?,
    })
}

pub(crate) fn ayah_from_row(row: &Row<'_>) -> rusqlite::Result<Ayah> {
    Ok(Ayah {
        id: key(row, "id")?,
        surah: key(row, "surah")?,
        ayah: key(row, "ayah")?,
        juz: text(row, "juz")?,
        page: text(row, "page")?,
        arab: text(row, "arab")?,
        text: text(row, "text")?,
        latin: text(row, "latin")?,
        theme: text(row, "theme")?,
        audio_partial: json_map(row, "audio_partial")?,
    })
}

fn tafsir_from_row(row: &Row<'_>) -> rusqlite::Result<Tafsir> {
    Ok(Tafsir {
        id: key(row, "id")?,
        tafsir: text(row, "tafsir")?,
    })
}

fn theme_from_row(row: &Row<'_>) -> rusqlite::Result<Theme> {
    Ok(Theme {
        id: key(row, "id")?,
        name: text(row, "name")?,
    })
}

fn asbab_from_row(row: &Row<'_>) -> rusqlite::Result<AsbabNuzul> {
    Ok(AsbabNuzul {
        id: key(row, "id")?,
        surah: text(row, "surah")?,
        ayah: text(row, "ayah")?,
        text: text(row, "text")?,
    })
}

fn qari_from_row(row: &Row<'_>) -> rusqlite::Result<Qari> {
    Ok(Qari {
        id: key(row, "id")?,
        name: text(row, "name")?,
    })
}

fn murotal_from_row(row: &Row<'_>, qari_id: &str) -> rusqlite::Result<MurotalEntry> {
    let audio = json_map(row, "audio_full")?;
    Ok(MurotalEntry {
        surah_id: key(row, "number")?,
        name: text(row, "name_id")?,
        name_short: text(row, "name_short")?,
        qari_id: None,
        audio_url: audio.get(qari_id).cloned(),
    })
}

fn bind(value: &str) -> SqlValue {
    SqlValue::Text(value.to_string())
}

fn parse_verse_number(name: &str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidInput(format!("{name} must be an integer, got '{value}'")))
}

/// Read operations over the Quran tables.
#[derive(Debug, Clone)]
pub struct QuranService {
    store: Store,
}

impl QuranService {
    /// Creates a new Quran service.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Lists all surahs in numeric order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn surahs(&self) -> Result<Vec<Surah>> {
        self.store
            .query_many(
                "surah_list",
                "SELECT * FROM surah ORDER BY CAST(number AS INTEGER)",
                vec![],
                surah_from_row,
            )
            .await
    }

    /// Returns one surah.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown number.
    #[instrument(skip(self))]
    pub async fn surah(&self, number: &str) -> Result<Surah> {
        self.store
            .query_one(
                "surah_get",
                "SELECT * FROM surah WHERE number = ?1",
                vec![bind(number)],
                surah_from_row,
            )
            .await?
            .ok_or_else(|| Error::NotFound(format!("surah {number} not found")))
    }

    /// Lists every verse in global order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn ayahs(&self) -> Result<Vec<Ayah>> {
        self.store
            .query_many(
                "ayah_list",
                "SELECT * FROM ayah ORDER BY CAST(id AS INTEGER)",
                vec![],
                ayah_from_row,
            )
            .await
    }

    /// Returns the verses of a surah whose number lies in `[start, end]`.
    ///
    /// An inverted range yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when `start` or `end` is not an integer.
    #[instrument(skip(self))]
    pub async fn ayah_range(&self, surah: &str, start: &str, end: &str) -> Result<Vec<Ayah>> {
        let start = parse_verse_number("start", start)?;
        let end = parse_verse_number("end", end)?;
        self.store
            .query_many(
                "ayah_range",
                "SELECT * FROM ayah WHERE surah = ?1 \
                 AND CAST(ayah AS INTEGER) BETWEEN ?2 AND ?3 \
                 ORDER BY CAST(ayah AS INTEGER)",
                vec![bind(surah), SqlValue::Integer(start), SqlValue::Integer(end)],
                ayah_from_row,
            )
            .await
    }

    /// Lists the verses of one surah.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn ayahs_by_surah(&self, surah: &str) -> Result<Vec<Ayah>> {
        self.ayahs_where("ayah_by_surah", "surah", surah).await
    }

    /// Lists the verses of one juz.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn ayahs_by_juz(&self, juz: &str) -> Result<Vec<Ayah>> {
        self.ayahs_where("ayah_by_juz", "juz", juz).await
    }

    /// Lists the verses on one mushaf page.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn ayahs_by_page(&self, page: &str) -> Result<Vec<Ayah>> {
        self.ayahs_where("ayah_by_page", "page", page).await
    }

    async fn ayahs_where(
        &self,
        operation: &'static str,
        column: &'static str,
        value: &str,
    ) -> Result<Vec<Ayah>> {
        self.store
            .query_many(
                operation,
                format!("SELECT * FROM ayah WHERE {column} = ?1 ORDER BY CAST(id AS INTEGER)"),
                vec![bind(value)],
                ayah_from_row,
            )
            .await
    }

    /// Returns one verse.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the verse does not exist.
    #[instrument(skip(self))]
    pub async fn ayah(&self, surah: &str, ayah: &str) -> Result<Ayah> {
        self.store
            .query_one(
                "ayah_get",
                "SELECT * FROM ayah WHERE surah = ?1 AND ayah = ?2",
                vec![bind(surah), bind(ayah)],
                ayah_from_row,
            )
            .await?
            .ok_or_else(|| Error::NotFound(format!("ayah {ayah} of surah {surah} not found")))
    }

    /// Finds verses whose translation contains `query`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a query of three characters or fewer.
    #[instrument(skip(self))]
    pub async fn find_ayahs(&self, query: &str) -> Result<Vec<Ayah>> {
        if query.chars().count() <= MIN_FIND_QUERY_CHARS {
            return Err(Error::InvalidInput(
                "query must be longer than 3 characters".to_string(),
            ));
        }
        self.store
            .query_many(
                "ayah_find",
                "SELECT * FROM ayah WHERE text LIKE ?1 ESCAPE '\\' ORDER BY CAST(id AS INTEGER)",
                vec![SqlValue::Text(contains_pattern(query))],
                ayah_from_row,
            )
            .await
    }

    /// Lists every tafsir.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn tafsirs(&self) -> Result<Vec<Tafsir>> {
        self.store
            .query_many(
                "tafsir_list",
                "SELECT * FROM tafsir ORDER BY CAST(id AS INTEGER)",
                vec![],
                tafsir_from_row,
            )
            .await
    }

    /// Returns the tafsir of one surah.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when missing.
    #[instrument(skip(self))]
    pub async fn tafsir(&self, surah: &str) -> Result<Tafsir> {
        self.store
            .query_one(
                "tafsir_get",
                "SELECT * FROM tafsir WHERE id = ?1",
                vec![bind(surah)],
                tafsir_from_row,
            )
            .await?
            .ok_or_else(|| Error::NotFound(format!("tafsir of surah {surah} not found")))
    }

    /// Lists every theme.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn themes(&self) -> Result<Vec<Theme>> {
        self.store
            .query_many(
                "theme_list",
                "SELECT * FROM theme ORDER BY CAST(id AS INTEGER)",
                vec![],
                theme_from_row,
            )
            .await
    }

    /// Returns one theme.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when missing.
    #[instrument(skip(self))]
    pub async fn theme(&self, id: &str) -> Result<Theme> {
        self.store
            .query_one(
                "theme_get",
                "SELECT * FROM theme WHERE id = ?1",
                vec![bind(id)],
                theme_from_row,
            )
            .await?
            .ok_or_else(|| Error::NotFound(format!("theme {id} not found")))
    }

    /// Lists every asbab al-nuzul record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn asbab_list(&self) -> Result<Vec<AsbabNuzul>> {
        self.store
            .query_many(
                "asbab_list",
                "SELECT * FROM asbab_nuzul ORDER BY CAST(id AS INTEGER)",
                vec![],
                asbab_from_row,
            )
            .await
    }

    /// Returns one asbab al-nuzul record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when missing.
    #[instrument(skip(self))]
    pub async fn asbab(&self, id: &str) -> Result<AsbabNuzul> {
        self.store
            .query_one(
                "asbab_get",
                "SELECT * FROM asbab_nuzul WHERE id = ?1",
                vec![bind(id)],
                asbab_from_row,
            )
            .await?
            .ok_or_else(|| Error::NotFound(format!("asbab al-nuzul {id} not found")))
    }

    /// Lists every reciter.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn qaris(&self) -> Result<Vec<Qari>> {
        self.store
            .query_many(
                "qari_list",
                "SELECT * FROM qari ORDER BY id",
                vec![],
                qari_from_row,
            )
            .await
    }

    /// Returns one reciter, or a placeholder named `Unknown`.
    async fn qari_or_placeholder(&self, qari_id: &str) -> Result<Qari> {
        let qari = self
            .store
            .query_one(
                "qari_get",
                "SELECT * FROM qari WHERE id = ?1",
                vec![bind(qari_id)],
                qari_from_row,
            )
            .await?;
        Ok(qari.unwrap_or_else(|| Qari {
            id: qari_id.to_string(),
            name: Some("Unknown".to_string()),
        }))
    }

    /// Returns one surah's full recitation by a reciter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the surah does not exist.
    #[instrument(skip(self))]
    pub async fn murotal_surah(&self, qari_id: &str, surah: &str) -> Result<MurotalEntry> {
        let qari = qari_id.to_string();
        let entry = self
            .store
            .query_one(
                "murotal_surah",
                "SELECT number, name_id, name_short, audio_full FROM surah WHERE number = ?1",
                vec![bind(surah)],
                move |row| murotal_from_row(row, &qari),
            )
            .await?
            .ok_or_else(|| Error::NotFound(format!("surah {surah} not found")))?;

        Ok(MurotalEntry {
            qari_id: Some(qari_id.to_string()),
            ..entry
        })
    }

    /// Returns every surah's recitation URL for a reciter.
    ///
    /// Surahs the reciter has no recording of carry a `null` URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn murotal_playlist(&self, qari_id: &str) -> Result<MurotalPlaylist> {
        let qari = self.qari_or_placeholder(qari_id).await?;
        let id = qari_id.to_string();
        let surahs = self
            .store
            .query_many(
                "murotal_playlist",
                "SELECT number, name_id, name_short, audio_full FROM surah \
                 ORDER BY CAST(number AS INTEGER)",
                vec![],
                move |row| murotal_from_row(row, &id),
            )
            .await?;
        Ok(MurotalPlaylist { qari, surahs })
    }
}
