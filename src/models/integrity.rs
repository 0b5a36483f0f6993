//! Integrity chain and verification payloads.
//!
//! Field order in [`VerseContent`] and [`BlockRecord`] is part of the hash
//! input: both are serialized to compact JSON in declaration order.

use serde::{Deserialize, Serialize};

/// Hash algorithm reported in chain responses.
pub const ALGORITHM: &str = "SHA-256";

/// Description of the hashed content unit.
pub const STRUCTURE: &str = "Array of Objects { arab, text }";

/// Ledger name reported in chain responses.
pub const NETWORK: &str = "Muslim-API Data Ledger";

/// Chain format version stamped into every block.
pub const CHAIN_VERSION: &str = "1.0.0";

/// Fixed block timestamp for this chain version.
pub const CHAIN_TIMESTAMP: &str = "2025-12-24T00:00:00Z";

/// `previous_hash` of the first block.
pub const GENESIS_PREVIOUS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// The hashed content of one verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseContent {
    /// Arabic text.
    pub arab: String,
    /// Translation.
    pub text: String,
}

/// The hashed part of a chain block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Surah number as stored.
    pub surah_number: String,
    /// Indonesian surah name, empty when absent.
    pub surah_name: String,
    /// Number of verses hashed.
    pub ayah_count: usize,
    /// SHA-256 of the surah's verse array.
    pub content_hash: String,
    /// Hash of the preceding block.
    pub previous_hash: String,
    /// Chain format version.
    pub version: String,
    /// Fixed timestamp for this chain version.
    pub timestamp: String,
}

/// A block in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainBlock {
    /// 1-based position.
    pub block_height: usize,
    /// SHA-256 of the block record.
    pub hash: String,
    /// The hashed record.
    #[serde(flatten)]
    pub record: BlockRecord,
}

/// The full integrity chain over the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityChain {
    /// Always [`ALGORITHM`].
    pub algorithm: String,
    /// Always [`STRUCTURE`].
    pub structure: String,
    /// Always [`NETWORK`].
    pub network: String,
    /// Hash of the last block, or the genesis hash for an empty corpus.
    pub root_hash: String,
    /// Blocks in surah order.
    pub chain: Vec<ChainBlock>,
}

/// Outcome of the quick integrity probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrityStatus {
    /// Al-Fatihah and its verses are present.
    Healthy,
    /// The probe ran but Al-Fatihah data is missing.
    Warning,
    /// The probe itself failed.
    Error,
}

/// Result of the quick integrity probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickVerification {
    /// Human-readable summary.
    pub message: String,
    /// What was checked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,
    /// Probe outcome.
    pub integrity: IntegrityStatus,
    /// Failure detail when `integrity` is [`IntegrityStatus::Error`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the probe ran (RFC 3339).
    pub timestamp: String,
}

/// Per-field comparison with the external source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDetails {
    /// Whitespace-normalized Arabic text matches.
    pub arab_match: bool,
    /// Whitespace-normalized translation matches.
    pub translation_match: bool,
}

/// Live comparison against the external verse source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    /// `Success`, or a description of why no comparison was made.
    pub status: String,
    /// Name of the external source.
    pub source: String,
    /// Overall match, `null` when no comparison was made.
    pub is_match: Option<bool>,
    /// Per-field results on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<MatchDetails>,
    /// The external verse on success.
    pub external_data: Option<VerseContent>,
}

/// Result of verifying one verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AyahVerification {
    /// Surah number as requested.
    #[serde(rename = "surahId")]
    pub surah_id: String,
    /// Verse number as requested.
    #[serde(rename = "ayahId")]
    pub ayah_id: String,
    /// Local verse content.
    pub local_data: VerseContent,
    /// SHA-256 of `local_data`.
    pub hash: String,
    /// Live comparison outcome.
    pub comparison: Comparison,
    /// Public page for manual verification.
    pub external_verification_url: String,
    /// When the verification ran (RFC 3339).
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_hash_shape() {
        assert_eq!(GENESIS_PREVIOUS_HASH.len(), 64);
        assert!(GENESIS_PREVIOUS_HASH.chars().all(|c| c == '0'));
    }

    #[test]
    fn test_block_record_key_order() {
        let record = BlockRecord {
            surah_number: "1".to_string(),
            surah_name: "Al-Fatihah".to_string(),
            ayah_count: 7,
            content_hash: "c".to_string(),
            previous_hash: "p".to_string(),
            version: CHAIN_VERSION.to_string(),
            timestamp: CHAIN_TIMESTAMP.to_string(),
        };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"surah_number":"1","surah_name":"Al-Fatihah","ayah_count":7,"content_hash":"c","previous_hash":"p","version":"1.0.0","timestamp":"2025-12-24T00:00:00Z"}"#
        );
    }

    #[test]
    fn test_chain_block_flattens_record() {
        let block = ChainBlock {
            block_height: 1,
            hash: "h".to_string(),
            record: BlockRecord {
                surah_number: "1".to_string(),
                surah_name: String::new(),
                ayah_count: 0,
                content_hash: "c".to_string(),
                previous_hash: "p".to_string(),
                version: CHAIN_VERSION.to_string(),
                timestamp: CHAIN_TIMESTAMP.to_string(),
            },
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["block_height"], 1);
        assert_eq!(json["surah_number"], "1");
        assert!(json.get("record").is_none());
    }
}
