//! `SQLite` migration system for schema management.
//!
//! Migrations are embedded at compile time and tracked with
//! `PRAGMA user_version`, so an existing reference database that already has
//! the tables is upgraded in place without touching its rows.
//!
//! # Usage
//!
//! ```rust,ignore
//! use muslim_api::storage::migrations::MigrationRunner;
//!
//! let applied = MigrationRunner::new("data/alquran.db").run()?;
//! println!("applied {applied} migrations");
//! ```

use crate::{Error, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// A single migration with version and SQL.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Migration version (sequential, starting at 1).
    pub version: u32,
    /// Human-readable description.
    pub description: &'static str,
    /// SQL to apply (may contain multiple statements).
    pub sql: &'static str,
}

/// Embedded migrations, in version order.
///
/// Key columns are `TEXT` to match the reference database; every query that
/// orders by a key casts it to an integer.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Reference tables",
        sql: r"
            CREATE TABLE IF NOT EXISTS surah (
                number TEXT PRIMARY KEY,
                sequence TEXT,
                number_of_verses TEXT,
                name_short TEXT,
                name_long TEXT,
                name_en TEXT,
                name_id TEXT,
                translation_en TEXT,
                translation_id TEXT,
                revelation TEXT,
                revelation_en TEXT,
                revelation_id TEXT,
                audio_full TEXT
            );
            CREATE TABLE IF NOT EXISTS ayah (
                id TEXT PRIMARY KEY,
                surah TEXT NOT NULL,
                ayah TEXT NOT NULL,
                juz TEXT,
                page TEXT,
                arab TEXT,
                text TEXT,
                latin TEXT,
                theme TEXT,
                audio_partial TEXT
            );
            CREATE TABLE IF NOT EXISTS tafsir (
                id TEXT PRIMARY KEY,
                tafsir TEXT
            );
            CREATE TABLE IF NOT EXISTS hadits (
                no TEXT PRIMARY KEY,
                judul TEXT,
                arab TEXT,
                indo TEXT
            );
            CREATE TABLE IF NOT EXISTS asmaul_husna (
                id TEXT PRIMARY KEY,
                arab TEXT,
                latin TEXT,
                indo TEXT
            );
            CREATE TABLE IF NOT EXISTS dzikir (
                id TEXT PRIMARY KEY,
                title TEXT,
                arabic TEXT,
                translation TEXT,
                type TEXT
            );
            CREATE TABLE IF NOT EXISTS doa (
                id TEXT PRIMARY KEY,
                title TEXT,
                arabic TEXT,
                translation TEXT,
                category TEXT
            );
            CREATE TABLE IF NOT EXISTS asbab_nuzul (
                id TEXT PRIMARY KEY,
                surah TEXT,
                ayah TEXT,
                text TEXT
            );
            CREATE TABLE IF NOT EXISTS masjid (
                id TEXT PRIMARY KEY,
                nama TEXT,
                deskripsi TEXT,
                lokasi TEXT,
                latitude REAL,
                longitude REAL,
                jenis TEXT,
                tipologi TEXT
            );
            CREATE TABLE IF NOT EXISTS sejarah (
                id TEXT PRIMARY KEY,
                kategori TEXT,
                tahun TEXT,
                judul TEXT,
                deskripsi TEXT
            );
            CREATE TABLE IF NOT EXISTS theme (
                id TEXT PRIMARY KEY,
                name TEXT
            );
            CREATE TABLE IF NOT EXISTS qari (
                id TEXT PRIMARY KEY,
                name TEXT
            );
        ",
    },
    Migration {
        version: 2,
        description: "Lookup indexes",
        sql: r"
            CREATE INDEX IF NOT EXISTS idx_ayah_surah_ayah ON ayah (surah, ayah);
            CREATE INDEX IF NOT EXISTS idx_ayah_juz ON ayah (juz);
            CREATE INDEX IF NOT EXISTS idx_ayah_page ON ayah (page);
            CREATE INDEX IF NOT EXISTS idx_masjid_lat_lng ON masjid (latitude, longitude);
            CREATE INDEX IF NOT EXISTS idx_dzikir_type ON dzikir (type);
            CREATE INDEX IF NOT EXISTS idx_doa_category ON doa (category);
        ",
    },
    Migration {
        version: 3,
        description: "Verse key constraints",
        sql: r"
            DROP INDEX IF EXISTS idx_ayah_surah_ayah;
            CREATE UNIQUE INDEX IF NOT EXISTS idx_ayah_surah_ayah ON ayah (surah, ayah);
            CREATE TRIGGER IF NOT EXISTS trg_ayah_surah_insert
            BEFORE INSERT ON ayah
            WHEN NOT EXISTS (SELECT 1 FROM surah WHERE number = NEW.surah)
            BEGIN
                SELECT RAISE(ABORT, 'ayah references unknown surah');
            END;
            CREATE TRIGGER IF NOT EXISTS trg_ayah_surah_update
            BEFORE UPDATE OF surah ON ayah
            WHEN NOT EXISTS (SELECT 1 FROM surah WHERE number = NEW.surah)
            BEGIN
                SELECT RAISE(ABORT, 'ayah references unknown surah');
            END;
            CREATE TRIGGER IF NOT EXISTS trg_surah_delete
            BEFORE DELETE ON surah
            WHEN EXISTS (SELECT 1 FROM ayah WHERE surah = OLD.number)
            BEGIN
                SELECT RAISE(ABORT, 'surah still has verses');
            END;
        ",
    },
];

/// Runs migrations against a database file, creating it if needed.
#[derive(Debug, Clone)]
pub struct MigrationRunner {
    path: PathBuf,
}

impl MigrationRunner {
    /// Creates a new migration runner.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Applies every embedded migration newer than the file's version.
    ///
    /// Returns how many migrations were applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or a migration fails.
    pub fn run(&self) -> Result<usize> {
        self.run_migrations(MIGRATIONS)
    }

    /// Applies the given migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or a migration fails.
    /// A failed migration is rolled back and leaves the version unchanged.
    pub fn run_migrations(&self, migrations: &[Migration]) -> Result<usize> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::operation("migration_create_dir", e))?;
        }

        let mut conn =
            Connection::open(&self.path).map_err(|e| Error::operation("migration_open", e))?;

        let current = current_version(&conn)?;
        let mut applied = 0;

        for migration in migrations.iter().filter(|m| m.version > current) {
            apply_migration(&mut conn, migration)?;
            applied += 1;
        }

        Ok(applied)
    }

    /// Returns the schema version recorded in the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn current_version(&self) -> Result<u32> {
        let conn =
            Connection::open(&self.path).map_err(|e| Error::operation("migration_open", e))?;
        current_version(&conn)
    }
}

fn current_version(conn: &Connection) -> Result<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| Error::operation("migration_get_version", e))
}

fn apply_migration(conn: &mut Connection, migration: &Migration) -> Result<()> {
    let tx = conn
        .transaction()
        .map_err(|e| Error::operation("migration_begin", e))?;

    tx.execute_batch(migration.sql).map_err(|e| Error::OperationFailed {
        operation: format!("migration_v{}", migration.version),
        cause: e.to_string(),
    })?;
    tx.pragma_update(None, "user_version", migration.version)
        .map_err(|e| Error::operation("migration_set_version", e))?;

    tx.commit()
        .map_err(|e| Error::operation("migration_commit", e))?;

    tracing::info!(
        version = migration.version,
        description = migration.description,
        "Applied migration"
    );
    Ok(())
}
