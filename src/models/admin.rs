//! Admin update requests and diffs.

use serde::{Deserialize, Serialize};

/// A key given either as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    /// `{"id": 7}`
    Number(serde_json::Number),
    /// `{"id": "7"}`
    Text(String),
}

impl KeyValue {
    /// Returns the key as stored, or `None` when blank.
    #[must_use]
    pub fn as_key(&self) -> Option<String> {
        let key = match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        };
        (!key.is_empty()).then_some(key)
    }
}

/// Body of `PATCH /admin/ayah`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AyahPatch {
    /// Surah number.
    pub surah_id: Option<KeyValue>,
    /// Verse number.
    pub ayah_id: Option<KeyValue>,
    /// New Arabic text.
    pub arab: Option<String>,
    /// New translation.
    pub text: Option<String>,
    /// New transliteration.
    pub latin: Option<String>,
}

/// Body of `PATCH /admin/dzikir` and `PATCH /admin/doa`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TextPatch {
    /// Record id.
    pub id: Option<KeyValue>,
    /// New title.
    pub title: Option<String>,
    /// New Arabic text.
    pub arabic: Option<String>,
    /// New translation.
    pub translation: Option<String>,
}

/// The editable fields of a verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AyahFields {
    /// Arabic text.
    pub arab: Option<String>,
    /// Translation.
    pub text: Option<String>,
    /// Transliteration.
    pub latin: Option<String>,
}

/// The editable fields of a dzikir or doa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFields {
    /// Title.
    pub title: Option<String>,
    /// Arabic text.
    pub arabic: Option<String>,
    /// Translation.
    pub translation: Option<String>,
}

/// Editable fields before and after an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff<T> {
    /// Values read before the update.
    pub before: T,
    /// Values read back after the update.
    pub after: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_accepts_number_and_string() {
        let patch: TextPatch = serde_json::from_str(r#"{"id": 999}"#).unwrap();
        assert_eq!(patch.id.and_then(|k| k.as_key()).as_deref(), Some("999"));

        let patch: TextPatch = serde_json::from_str(r#"{"id": " 12 "}"#).unwrap();
        assert_eq!(patch.id.and_then(|k| k.as_key()).as_deref(), Some("12"));

        let patch: TextPatch = serde_json::from_str(r#"{"id": ""}"#).unwrap();
        assert_eq!(patch.id.and_then(|k| k.as_key()), None);
    }

    #[test]
    fn test_ayah_patch_camel_case() {
        let patch: AyahPatch =
            serde_json::from_str(r#"{"surahId": 1, "ayahId": "2", "latin": "x"}"#).unwrap();
        assert_eq!(patch.surah_id.and_then(|k| k.as_key()).as_deref(), Some("1"));
        assert_eq!(patch.ayah_id.and_then(|k| k.as_key()).as_deref(), Some("2"));
        assert_eq!(patch.latin.as_deref(), Some("x"));
    }
}
