//! Third-party API locations.

use super::ConfigFileUpstream;
use std::time::Duration;

/// Base URL of the hadith books API.
pub const DEFAULT_HADITH_BASE_URL: &str = "https://api.hadith.gading.dev";

/// Base URL of the national holiday API.
pub const DEFAULT_HOLIDAY_BASE_URL: &str = "https://api-harilibur.vercel.app/api";

/// Base URL of the pesantren dataset.
pub const DEFAULT_PESANTREN_BASE_URL: &str =
    "https://raw.githubusercontent.com/nasrul21/data-pesantren-indonesia/master/data";

/// Base URL of the EQuran API used for live verse comparison.
pub const DEFAULT_EQURAN_BASE_URL: &str = "https://equran.id/api/v2";

/// Public per-ayah page on the Kemenag Quran site.
pub const KEMENAG_AYAH_URL: &str = "https://quran.kemenag.go.id/quran/per-ayat/surah";

/// Upstream API configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    /// Hadith books API base URL.
    pub hadith_base_url: String,
    /// Holiday API base URL.
    pub holiday_base_url: String,
    /// Pesantren dataset base URL.
    pub pesantren_base_url: String,
    /// EQuran API base URL.
    pub equran_base_url: String,
    /// Request timeout for proxied calls in milliseconds.
    pub timeout_ms: u64,
    /// Request timeout for the verification comparison in milliseconds.
    pub verify_timeout_ms: u64,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            hadith_base_url: DEFAULT_HADITH_BASE_URL.to_string(),
            holiday_base_url: DEFAULT_HOLIDAY_BASE_URL.to_string(),
            pesantren_base_url: DEFAULT_PESANTREN_BASE_URL.to_string(),
            equran_base_url: DEFAULT_EQURAN_BASE_URL.to_string(),
            timeout_ms: 10_000,
            verify_timeout_ms: 3_000,
            connect_timeout_ms: 3_000,
        }
    }
}

impl UpstreamConfig {
    /// Points every upstream at one base URL (used by tests with a local fake).
    #[must_use]
    pub fn all_at(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            hadith_base_url: base.clone(),
            holiday_base_url: base.clone(),
            pesantren_base_url: base.clone(),
            equran_base_url: base,
            ..Self::default()
        }
    }

    /// Request timeout for proxied calls.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Request timeout for the verification comparison.
    #[must_use]
    pub const fn verify_timeout(&self) -> Duration {
        Duration::from_millis(self.verify_timeout_ms)
    }

    /// Connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub(super) fn apply_file(&mut self, file: ConfigFileUpstream) {
        if let Some(v) = file.hadith_base_url {
            self.hadith_base_url = v;
        }
        if let Some(v) = file.holiday_base_url {
            self.holiday_base_url = v;
        }
        if let Some(v) = file.pesantren_base_url {
            self.pesantren_base_url = v;
        }
        if let Some(v) = file.equran_base_url {
            self.equran_base_url = v;
        }
        if let Some(v) = file.timeout_ms {
            self.timeout_ms = v;
        }
        if let Some(v) = file.verify_timeout_ms {
            self.verify_timeout_ms = v;
        }
    }
}
