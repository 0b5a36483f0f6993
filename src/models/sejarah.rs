//! Islamic history events.

use serde::{Deserialize, Serialize};

/// A historical event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sejarah {
    /// Record id.
    pub id: String,
    /// Category.
    pub kategori: Option<String>,
    /// Free-text date; mixes Hijri day-month strings and Gregorian years.
    pub tahun: Option<String>,
    /// Title.
    pub judul: Option<String>,
    /// Description.
    pub deskripsi: Option<String>,
}

/// Events matching today's date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayEvents {
    /// Matching events, at most ten.
    pub events: Vec<Sejarah>,
    /// Today's date as matched, e.g. `17 Agustus`.
    pub today: String,
}
