//! Hadith records.

use serde::{Deserialize, Serialize};

/// A hadith from the local Arbain collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hadith {
    /// Hadith number.
    pub no: String,
    /// Title.
    pub judul: Option<String>,
    /// Arabic text.
    pub arab: Option<String>,
    /// Indonesian translation.
    pub indo: Option<String>,
}
