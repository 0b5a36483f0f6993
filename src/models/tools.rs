//! Payloads of the calculator and search tools.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// Qibla bearing from a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QiblaDirection {
    /// The query point.
    pub coordinates: Coordinates,
    /// The Kaaba.
    pub kaaba: Coordinates,
    /// Bearing clockwise from true north, in `[0, 360)`.
    pub qibla_direction: f64,
    /// Always `degrees`.
    pub unit: &'static str,
}

/// Kind of zakat being computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZakatKind {
    /// Zakat on wealth held for a year.
    Maal,
    /// Zakat on monthly income.
    Penghasilan,
    /// Per-person zakat at the end of Ramadan.
    Fitrah,
}

impl ZakatKind {
    /// Parses a kind name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "maal" => Some(Self::Maal),
            "penghasilan" => Some(Self::Penghasilan),
            "fitrah" => Some(Self::Fitrah),
            _ => None,
        }
    }
}

/// Zakat calculator inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZakatRequest {
    /// Kind of zakat.
    pub kind: ZakatKind,
    /// Wealth or income amount in rupiah.
    pub amount: f64,
    /// Gold price per gram.
    pub gold_price: f64,
    /// Rice price per kilogram.
    pub rice_price: f64,
    /// Number of people (fitrah only).
    pub people: u32,
}

/// Zakat calculator result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZakatCalculation {
    /// Kind of zakat.
    #[serde(rename = "type")]
    pub kind: ZakatKind,
    /// Amount given.
    pub amount: f64,
    /// Threshold above which zakat is due (0 for fitrah).
    pub nishab: f64,
    /// Whether zakat is due.
    #[serde(rename = "isWajib")]
    pub is_wajib: bool,
    /// Amount of zakat due.
    pub zakat: f64,
    /// Explanation of the rule applied.
    pub keterangan: String,
}

/// A quoted verse or hadith with its source label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Arabic text.
    pub arab: Option<String>,
    /// Translation.
    pub text: Option<String>,
    /// Source label, e.g. `QS. Al-Fatihah: 1`.
    pub sumber: String,
}

/// One random verse and one random hadith.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyQuotes {
    /// The verse, absent when the corpus is empty.
    pub ayat: Option<Quote>,
    /// The hadith, absent when the collection is empty.
    pub hadits: Option<Quote>,
}

/// Keyword matches across the Quran and hadith.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSearch {
    /// The query as given.
    pub query: String,
    /// Matching verses.
    pub quran: Vec<Quote>,
    /// Matching hadith.
    pub hadits: Vec<Quote>,
}
