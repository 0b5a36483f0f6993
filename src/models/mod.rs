//! Data models for muslim-api.
//!
//! Plain serde types. Row shaping lives with the resolvers in
//! [`crate::services`].

mod admin;
mod calendar;
mod devotion;
mod hadith;
pub mod integrity;
mod masjid;
mod quran;
mod sejarah;
mod tools;

pub use admin::{AyahFields, AyahPatch, Diff, KeyValue, TextFields, TextPatch};
pub use calendar::{Holiday, HolidayCalendar};
pub use devotion::{AsmaulHusna, Doa, Dzikir};
pub use hadith::Hadith;
pub use integrity::{
    AyahVerification, BlockRecord, ChainBlock, Comparison, IntegrityChain, IntegrityStatus,
    MatchDetails, QuickVerification, VerseContent,
};
pub use masjid::{Masjid, MasjidFilter, NearbyMasjid, NearbyQuery};
pub use quran::{
    AsbabNuzul, AudioMap, Ayah, MurotalEntry, MurotalPlaylist, Qari, Surah, Tafsir, Theme,
};
pub use sejarah::{Sejarah, TodayEvents};
pub use tools::{
    Coordinates, DailyQuotes, KeywordSearch, QiblaDirection, Quote, ZakatCalculation, ZakatKind,
    ZakatRequest,
};
