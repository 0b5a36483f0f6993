//! Devotional texts: the 99 names, dzikir and supplications.

use serde::{Deserialize, Serialize};

/// One of the 99 names of Allah.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsmaulHusna {
    /// Position, 1 to 99.
    pub id: String,
    /// Arabic script.
    pub arab: Option<String>,
    /// Latin transliteration.
    pub latin: Option<String>,
    /// Indonesian meaning.
    pub indo: Option<String>,
}

/// A remembrance formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dzikir {
    /// Record id.
    pub id: String,
    /// Title.
    pub title: Option<String>,
    /// Arabic text.
    pub arabic: Option<String>,
    /// Translation.
    pub translation: Option<String>,
    /// Time of day or occasion (e.g. `pagi`, `sore`).
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// A supplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doa {
    /// Record id.
    pub id: String,
    /// Title.
    pub title: Option<String>,
    /// Arabic text.
    pub arabic: Option<String>,
    /// Translation.
    pub translation: Option<String>,
    /// Category.
    pub category: Option<String>,
}
