//! Shared fixtures for integration tests: a seeded temp-file database, an
//! app router over it, and a local fake upstream.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use muslim_api::config::{ApiConfig, Environment, UpstreamConfig};
use muslim_api::server::{self, AppState};
use muslim_api::services::ServiceContainer;
use muslim_api::storage::MigrationRunner;
use rusqlite::{Connection, params};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tower::ServiceExt;

/// Admin key configured by [`TestApp::new`].
pub const ADMIN_KEY: &str = "test-admin-key";

/// Number of verses seeded for surah 2.
pub const SURAH_2_VERSES: i64 = 12;

/// A seeded database in a temp directory.
pub struct Fixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    /// Creates the schema and seeds every table.
    pub fn seeded() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("alquran.db");
        MigrationRunner::new(&path).run().expect("migrations");
        seed(&path);
        Self { dir, path }
    }

    /// Opens a read-write connection for direct assertions.
    pub fn connection(&self) -> Connection {
        Connection::open(&self.path).expect("open fixture db")
    }

    /// Counts rows matching `sql`.
    pub fn count(&self, sql: &str) -> i64 {
        self.connection()
            .query_row(sql, [], |row| row.get(0))
            .expect("count query")
    }
}

fn seed(path: &Path) {
    let conn = Connection::open(path).expect("open for seeding");

    let surahs = [
        ("1", "Al-Fatihah", "الفاتحة", 7),
        ("2", "Al-Baqarah", "البقرة", SURAH_2_VERSES),
        ("3", "Ali 'Imran", "اٰل عمران", 0),
    ];
    for (number, name_id, name_short, verses) in surahs {
        conn.execute(
            "INSERT INTO surah (number, sequence, number_of_verses, name_short, name_long, \
             name_en, name_id, translation_en, translation_id, revelation, revelation_en, \
             revelation_id, audio_full) VALUES (?1, ?1, ?2, ?3, ?3, ?4, ?4, '', '', '', '', '', ?5)",
            params![
                number,
                verses.to_string(),
                name_short,
                name_id,
                format!(r#"{{"05": "https://cdn.example.test/05/{number}.mp3"}}"#),
            ],
        )
        .expect("seed surah");
    }

    let mut id = 0;
    for (surah, count) in [("1", 7), ("2", SURAH_2_VERSES)] {
        for ayah in 1..=count {
            id += 1;
            let text = if surah == "1" && ayah == 1 {
                "Dengan nama Allah Yang Maha Pengasih, Maha Penyayang.".to_string()
            } else {
                format!("Terjemahan surah {surah} ayat {ayah}")
            };
            conn.execute(
                "INSERT INTO ayah (id, surah, ayah, juz, page, arab, text, latin, theme, audio_partial) \
                 VALUES (?1, ?2, ?3, '1', ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    id.to_string(),
                    surah,
                    ayah.to_string(),
                    if surah == "1" { "1" } else { "2" },
                    format!("arab {surah}:{ayah}"),
                    text,
                    format!("latin {surah}:{ayah}"),
                    if ayah == 2 { "Pujian" } else { "" },
                    r#"{"05": "https://cdn.example.test/partial.mp3"}"#,
                ],
            )
            .expect("seed ayah");
        }
    }

    conn.execute_batch(
        r#"
        INSERT INTO tafsir (id, tafsir) VALUES ('1', 'Tafsir Al-Fatihah');
        INSERT INTO theme (id, name) VALUES ('1', 'Pujian'), ('2', 'Iman');
        INSERT INTO asbab_nuzul (id, surah, ayah, text) VALUES ('1', '2', '6', 'Sebab turunnya');
        INSERT INTO hadits (no, judul, arab, indo) VALUES
            ('1', 'Niat', 'إنما الأعمال بالنيات', 'Sesungguhnya amal tergantung niat'),
            ('2', 'Islam Iman Ihsan', 'arab 2', 'Jibril bertanya tentang Islam'),
            ('10', '', 'arab 10', 'Allah itu baik');
        INSERT INTO asmaul_husna (id, arab, latin, indo) VALUES
            ('1', 'الرحمن', 'Ar-Rahman', 'Yang Maha Pengasih'),
            ('2', 'الرحيم', 'Ar-Rahim', 'Yang Maha Penyayang');
        INSERT INTO dzikir (id, title, arabic, translation, type) VALUES
            ('1', 'Ayat Kursi', 'arabic 1', 'translation 1', 'pagi'),
            ('2', 'Al-Ikhlas', 'arabic 2', 'translation 2', 'petang');
        INSERT INTO doa (id, title, arabic, translation, category) VALUES
            ('1', 'Doa sebelum makan', 'arabic 1', 'translation 1', 'harian'),
            ('2', 'Doa bepergian', 'arabic 2', 'translation 2', 'safar');
        INSERT INTO qari (id, name) VALUES ('01', 'Abdullah Al-Juhany'), ('05', 'Misyari Rasyid Al-Afasy');
        INSERT INTO masjid (id, nama, deskripsi, lokasi, latitude, longitude, jenis, tipologi) VALUES
            ('1', 'Masjid Istiqlal', 'Masjid nasional 100% terbuka', 'Jakarta Pusat', -6.1702, 106.8310, 'Masjid', 'Nasional'),
            ('2', 'Masjid Sunda Kelapa', 'Masjid di Menteng', 'Jakarta Pusat', -6.2000, 106.8323, 'Masjid', 'Raya'),
            ('3', 'Masjid Raya Bandung', 'Masjid di alun-alun', 'Bandung', -6.9218, 107.6071, 'Masjid', 'Raya'),
            ('4', 'Mushalla Tanpa Koordinat', 'Belum dipetakan', 'Bogor', NULL, NULL, 'Mushalla', 'Publik');
        INSERT INTO sejarah (id, kategori, tahun, judul, deskripsi) VALUES
            ('1', 'Kemerdekaan', '17 Agustus 1945', 'Proklamasi', 'Proklamasi kemerdekaan'),
            ('2', 'Perang', 'Ramadhan 2 H', 'Perang Badar', 'Terjadi pada 17 Ramadhan'),
            ('3', 'Kemerdekaan Dakwah', 'Agustus 1950', 'Peristiwa', 'Dicatat bulan Agustus');
        "#,
    )
    .expect("seed remaining tables");
}

/// Configuration for a test app.
pub struct TestApp {
    pub fixture: Fixture,
    pub config: ApiConfig,
}

impl TestApp {
    /// Development app with [`ADMIN_KEY`] and unreachable upstreams.
    pub fn new() -> Self {
        Self::with_upstream(UpstreamConfig::all_at("http://127.0.0.1:9"))
    }

    /// Development app with the given upstreams.
    pub fn with_upstream(upstream: UpstreamConfig) -> Self {
        let fixture = Fixture::seeded();
        let config = ApiConfig::default()
            .with_database_path(&fixture.path)
            .with_environment(Environment::Development)
            .with_admin_api_key(ADMIN_KEY)
            .with_upstream(upstream);
        Self { fixture, config }
    }

    /// Builds a fresh router over the current configuration.
    pub fn router(&self) -> Router {
        let services = ServiceContainer::from_config(&self.config).expect("services");
        server::router(AppState::new(&self.config, services, None))
    }

    /// Issues a GET and decodes the JSON body.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        send(self.router(), request).await
    }

    /// Issues a PATCH with an optional admin key.
    pub async fn patch(&self, uri: &str, key: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("PATCH")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(key) = key {
            builder = builder.header("x-api-key", key);
        }
        let request = builder.body(Body::from(body.to_string())).expect("request");
        send(self.router(), request).await
    }
}

/// Sends a request through `router` and decodes the JSON body.
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake upstream");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake upstream");
    });
    format!("http://{addr}")
}
