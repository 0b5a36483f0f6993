//! Calculators and cross-corpus search.

use super::geo::{KAABA_LAT, KAABA_LNG, qibla_bearing};
use crate::models::{
    Coordinates, DailyQuotes, KeywordSearch, QiblaDirection, Quote, ZakatCalculation, ZakatKind,
    ZakatRequest,
};
use crate::storage::sqlite::{contains_pattern, key, text};
use crate::storage::{SqlValue, Store};
use crate::{Error, Result};
use rusqlite::Row;
use tracing::instrument;

/// Default gold price per gram, in rupiah.
pub const DEFAULT_GOLD_PRICE: f64 = 1_200_000.0;

/// Default rice price per kilogram, in rupiah.
pub const DEFAULT_RICE_PRICE: f64 = 15_000.0;

const NISHAB_GOLD_GRAMS: f64 = 85.0;
const ZAKAT_RATE: f64 = 0.025;
const FITRAH_RICE_KG: f64 = 2.5;

/// Verse columns joined with the surah's display name.
const AYAH_QUOTE_SELECT: &str = "SELECT a.arab, a.text, a.ayah, \
     COALESCE(NULLIF(s.name_id, ''), NULLIF(s.name_en, ''), s.name_long, a.surah) AS surah_name \
     FROM ayah a LEFT JOIN surah s ON s.number = a.surah";

fn ayah_quote_from_row(row: &Row<'_>) -> rusqlite::Result<Quote> {
    let surah = text(row, "surah_name")?.unwrap_or_default();
    Ok(Quote {
        arab: text(row, "arab")?,
        text: text(row, "text")?,
        sumber: format!("QS. {surah}: {}", key(row, "ayah")?),
    })
}

fn hadith_quote_from_row(row: &Row<'_>) -> rusqlite::Result<Quote> {
    let judul = text(row, "judul")?.filter(|j| !j.is_empty());
    Ok(Quote {
        arab: text(row, "arab")?,
        text: text(row, "indo")?,
        sumber: format!("HR. {}", judul.as_deref().unwrap_or("Hadits")),
    })
}

/// Formats rupiah with `.` thousands separators, e.g. `37.500`.
fn format_rupiah(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        grouped.insert(0, '-');
    }
    grouped
}

/// Computes the qibla bearing from a point.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for non-finite coordinates.
pub fn qibla(lat: f64, lng: f64) -> Result<QiblaDirection> {
    if !lat.is_finite() || !lng.is_finite() {
        return Err(Error::InvalidInput(
            "lat and lng must be numbers".to_string(),
        ));
    }
    Ok(QiblaDirection {
        coordinates: Coordinates { lat, lng },
        kaaba: Coordinates {
            lat: KAABA_LAT,
            lng: KAABA_LNG,
        },
        qibla_direction: qibla_bearing(lat, lng),
        unit: "degrees",
    })
}

/// Computes zakat due.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when the amount is not a positive number.
pub fn zakat(request: &ZakatRequest) -> Result<ZakatCalculation> {
    if !request.amount.is_finite() || request.amount <= 0.0 {
        return Err(Error::InvalidInput(
            "amount must be a number greater than 0".to_string(),
        ));
    }

    let wealth_rule = |nishab: f64, keterangan: &str| {
        let is_wajib = request.amount >= nishab;
        ZakatCalculation {
            kind: request.kind,
            amount: request.amount,
            nishab,
            is_wajib,
            zakat: if is_wajib { request.amount * ZAKAT_RATE } else { 0.0 },
            keterangan: keterangan.to_string(),
        }
    };

    Ok(match request.kind {
        ZakatKind::Maal => wealth_rule(
            NISHAB_GOLD_GRAMS * request.gold_price,
            "Zakat maal nishab is the value of 85 grams of gold held for a year. Rate 2.5%.",
        ),
        ZakatKind::Penghasilan => wealth_rule(
            NISHAB_GOLD_GRAMS * request.gold_price / 12.0,
            "Income zakat nishab is the value of 85 grams of gold per year, divided by 12 months. Rate 2.5%.",
        ),
        ZakatKind::Fitrah => {
            let per_person = FITRAH_RICE_KG * request.rice_price;
            ZakatCalculation {
                kind: request.kind,
                amount: request.amount,
                nishab: 0.0,
                is_wajib: true,
                zakat: per_person * f64::from(request.people),
                keterangan: format!(
                    "Zakat fitrah is 2.5 kg of rice per person. Estimated Rp{} per person.",
                    format_rupiah(per_person)
                ),
            }
        },
    })
}

/// Store-backed tools.
#[derive(Debug, Clone)]
pub struct ToolsService {
    store: Store,
}

impl ToolsService {
    /// Creates a new tools service.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Picks one random verse and one random hadith.
    ///
    /// # Errors
    ///
    /// Returns an error if a store query fails.
    #[instrument(skip(self))]
    pub async fn daily_quotes(&self) -> Result<DailyQuotes> {
        let ayat = self
            .store
            .query_one(
                "quote_ayah",
                format!("{AYAH_QUOTE_SELECT} ORDER BY RANDOM() LIMIT 1"),
                vec![],
                ayah_quote_from_row,
            )
            .await?;
        let hadits = self
            .store
            .query_one(
                "quote_hadith",
                "SELECT arab, indo, judul FROM hadits ORDER BY RANDOM() LIMIT 1",
                vec![],
                hadith_quote_from_row,
            )
            .await?;

        Ok(DailyQuotes { ayat, hadits })
    }

    /// Finds verses whose translation or theme, and hadith whose text or
    /// title, contain `query`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a blank query, or a store error.
    #[instrument(skip(self))]
    pub async fn keyword_search(&self, query: &str) -> Result<KeywordSearch> {
        if query.trim().is_empty() {
            return Err(Error::InvalidInput("query is required".to_string()));
        }
        let pattern = contains_pattern(query);

        let quran = self
            .store
            .query_many(
                "search_ayah",
                format!(
                    "{AYAH_QUOTE_SELECT} \
                     WHERE a.text LIKE ?1 ESCAPE '\\' OR a.theme LIKE ?1 ESCAPE '\\' \
                     ORDER BY CAST(a.surah AS INTEGER), CAST(a.ayah AS INTEGER)"
                ),
                vec![SqlValue::Text(pattern.clone())],
                ayah_quote_from_row,
            )
            .await?;
        let hadits = self
            .store
            .query_many(
                "search_hadith",
                "SELECT arab, indo, judul FROM hadits \
                 WHERE indo LIKE ?1 ESCAPE '\\' OR judul LIKE ?1 ESCAPE '\\' \
                 ORDER BY CAST(no AS INTEGER)",
                vec![SqlValue::Text(pattern)],
                hadith_quote_from_row,
            )
            .await?;

        Ok(KeywordSearch {
            query: query.to_string(),
            quran,
            hadits,
        })
    }
}
