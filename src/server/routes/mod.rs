//! Route tables, one module per endpoint family.

pub mod admin;
pub mod devotion;
pub mod hadith;
pub mod integrity;
pub mod kemenag;
pub mod murotal;
pub mod quran;
pub mod sejarah;
pub mod system;
pub mod tools;
