//! Quran text, translation, tafsir and audio.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reciter id to audio URL.
pub type AudioMap = BTreeMap<String, String>;

/// A surah (chapter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surah {
    /// Surah number, 1 to 114.
    pub number: String,
    /// Revelation order.
    pub sequence: Option<String>,
    /// Number of verses.
    pub number_of_verses: Option<String>,
    /// Short Arabic name.
    pub name_short: Option<String>,
    /// Long Arabic name.
    pub name_long: Option<String>,
    /// Transliterated name (English).
    pub name_en: Option<String>,
    /// Transliterated name (Indonesian).
    pub name_id: Option<String>,
    /// Meaning of the name in English.
    pub translation_en: Option<String>,
    /// Meaning of the name in Indonesian.
    pub translation_id: Option<String>,
    /// Place of revelation.
    pub revelation: Option<String>,
    /// Place of revelation (English).
    pub revelation_en: Option<String>,
    /// Place of revelation (Indonesian).
    pub revelation_id: Option<String>,
    /// Full-surah recitations keyed by reciter id.
    pub audio_full: AudioMap,
}

impl Surah {
    /// Best available display name: Indonesian, then English, then Arabic.
    #[must_use]
    pub fn display_name(&self) -> &str {
        [&self.name_id, &self.name_en, &self.name_long]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|name| !name.is_empty())
            .unwrap_or_default()
    }
}

/// A single verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ayah {
    /// Global verse sequence, 1 to 6236.
    pub id: String,
    /// Surah number.
    pub surah: String,
    /// Verse number within the surah.
    pub ayah: String,
    /// Juz the verse belongs to.
    pub juz: Option<String>,
    /// Mushaf page.
    pub page: Option<String>,
    /// Arabic text.
    pub arab: Option<String>,
    /// Indonesian translation.
    pub text: Option<String>,
    /// Latin transliteration.
    pub latin: Option<String>,
    /// Theme label.
    pub theme: Option<String>,
    /// Per-verse recitations keyed by reciter id.
    pub audio_partial: AudioMap,
}

/// Tafsir of one surah.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tafsir {
    /// Surah number.
    pub id: String,
    /// Commentary text.
    pub tafsir: Option<String>,
}

/// A Quranic theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Theme id.
    pub id: String,
    /// Theme name.
    pub name: Option<String>,
}

/// Circumstances of revelation for a verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsbabNuzul {
    /// Record id.
    pub id: String,
    /// Surah number (by convention; not enforced).
    pub surah: Option<String>,
    /// Verse number (by convention; not enforced).
    pub ayah: Option<String>,
    /// Narrative text.
    pub text: Option<String>,
}

/// A Quran reciter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qari {
    /// Reciter id, as used in the audio maps.
    pub id: String,
    /// Reciter name.
    pub name: Option<String>,
}

/// One surah's recitation by a chosen reciter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MurotalEntry {
    /// Surah number.
    #[serde(rename = "surahId")]
    pub surah_id: String,
    /// Indonesian surah name.
    pub name: Option<String>,
    /// Short Arabic name.
    pub name_short: Option<String>,
    /// Reciter id; only set for a single-surah lookup.
    #[serde(rename = "qariId", skip_serializing_if = "Option::is_none")]
    pub qari_id: Option<String>,
    /// Audio URL, or `null` when the reciter has no recording of the surah.
    pub audio_url: Option<String>,
}

/// All surahs recited by one reciter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MurotalPlaylist {
    /// The reciter, or a placeholder when the id is unknown.
    pub qari: Qari,
    /// One entry per surah, in surah order.
    pub surahs: Vec<MurotalEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surah() -> Surah {
        Surah {
            number: "1".to_string(),
            sequence: None,
            number_of_verses: Some("7".to_string()),
            name_short: None,
            name_long: Some("سُورَةُ ٱلْفَاتِحَةِ".to_string()),
            name_en: Some("Al-Faatiha".to_string()),
            name_id: Some(String::new()),
            translation_en: None,
            translation_id: None,
            revelation: None,
            revelation_en: None,
            revelation_id: None,
            audio_full: AudioMap::new(),
        }
    }

    #[test]
    fn test_display_name_skips_blank() {
        assert_eq!(surah().display_name(), "Al-Faatiha");

        let mut nameless = surah();
        nameless.name_en = None;
        nameless.name_long = None;
        assert_eq!(nameless.display_name(), "");
    }

    #[test]
    fn test_murotal_entry_field_names() {
        let entry = MurotalEntry {
            surah_id: "1".to_string(),
            name: Some("Al-Fatihah".to_string()),
            name_short: None,
            qari_id: None,
            audio_url: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["surahId"], "1");
        assert!(json.get("qariId").is_none());
        assert!(json["audio_url"].is_null());
    }
}
