//! Business logic services.
//!
//! Services own the SQL and upstream calls behind each endpoint family and
//! return typed payloads. [`ServiceContainer`] wires them to one [`Store`]
//! and one [`UpstreamClient`].

mod admin;
mod devotion;
pub mod geo;
mod hadith;
mod integrity;
mod kemenag;
mod masjid;
mod quran;
mod sejarah;
pub mod tools;
mod upstream;

pub use admin::AdminService;
pub use devotion::DevotionService;
pub use hadith::HadithService;
pub use integrity::{COMPARISON_SOURCE, ChainBuilder, IntegrityService, sha256_json};
pub use kemenag::KemenagService;
pub use masjid::MasjidService;
pub use quran::{DEFAULT_QARI_ID, QuranService};
pub use sejarah::{SejarahService, day_month_label, month_name};
pub use tools::ToolsService;
pub use upstream::{UpstreamClient, UpstreamResponse, build_http_client};

use crate::Result;
use crate::config::{ApiConfig, UpstreamConfig};
use crate::storage::Store;

/// All services over one store and one upstream client.
#[derive(Debug, Clone)]
pub struct ServiceContainer {
    store: Store,
    quran: QuranService,
    devotion: DevotionService,
    hadith: HadithService,
    masjid: MasjidService,
    sejarah: SejarahService,
    integrity: IntegrityService,
    admin: AdminService,
    tools: ToolsService,
    kemenag: KemenagService,
}

impl ServiceContainer {
    /// Opens the configured database and builds every service.
    ///
    /// An unreadable database does not fail here: the store comes up
    /// unavailable and each call reports it.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible for configuration checks.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let store = Store::open(&config.database);
        Ok(Self::new(store, config.upstream.clone()))
    }

    /// Builds every service over an existing store.
    #[must_use]
    pub fn new(store: Store, upstream: UpstreamConfig) -> Self {
        let upstream = UpstreamClient::new(upstream);
        Self {
            quran: QuranService::new(store.clone()),
            devotion: DevotionService::new(store.clone()),
            hadith: HadithService::new(store.clone(), upstream.clone()),
            masjid: MasjidService::new(store.clone()),
            sejarah: SejarahService::new(store.clone()),
            integrity: IntegrityService::new(store.clone(), upstream.clone()),
            admin: AdminService::new(store.clone()),
            tools: ToolsService::new(store.clone()),
            kemenag: KemenagService::new(upstream),
            store,
        }
    }

    /// The shared store.
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// Quran resolvers.
    #[must_use]
    pub const fn quran(&self) -> &QuranService {
        &self.quran
    }

    /// Asmaul husna, dzikir and doa.
    #[must_use]
    pub const fn devotion(&self) -> &DevotionService {
        &self.devotion
    }

    /// Arbain hadith and the hadith book proxy.
    #[must_use]
    pub const fn hadith(&self) -> &HadithService {
        &self.hadith
    }

    /// Mosque directory.
    #[must_use]
    pub const fn masjid(&self) -> &MasjidService {
        &self.masjid
    }

    /// Islamic history.
    #[must_use]
    pub const fn sejarah(&self) -> &SejarahService {
        &self.sejarah
    }

    /// Integrity chain and verification.
    #[must_use]
    pub const fn integrity(&self) -> &IntegrityService {
        &self.integrity
    }

    /// Admin edits.
    #[must_use]
    pub const fn admin(&self) -> &AdminService {
        &self.admin
    }

    /// Store-backed tools.
    #[must_use]
    pub const fn tools(&self) -> &ToolsService {
        &self.tools
    }

    /// Holiday and pesantren proxies.
    #[must_use]
    pub const fn kemenag(&self) -> &KemenagService {
        &self.kemenag
    }
}
