//! Admin PATCH surface: gate decisions, partial updates and their effect on
//! the integrity chain.
#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use axum::http::StatusCode;
use common::{ADMIN_KEY, TestApp};
use muslim_api::config::Environment;

fn ayah_text(app: &TestApp, surah: &str, ayah: &str) -> (String, String, String) {
    app.fixture
        .connection()
        .query_row(
            "SELECT arab, text, latin FROM ayah WHERE surah = ?1 AND ayah = ?2",
            [surah, ayah],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap()
}

#[tokio::test]
async fn test_production_is_forbidden_even_with_key() {
    let mut app = TestApp::new();
    app.config = app.config.clone().with_environment(Environment::Production);

    let (status, body) = app
        .patch("/admin/doa", Some(ADMIN_KEY), r#"{"id": 1, "title": "x"}"#)
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], false);
    assert_eq!(app.fixture.count("SELECT COUNT(*) FROM doa WHERE title = 'x'"), 0);
}

#[tokio::test]
async fn test_missing_or_wrong_key_is_unauthorized() {
    let app = TestApp::new();

    let (status, _) = app.patch("/admin/doa", None, r#"{"id": 1, "title": "x"}"#).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .patch("/admin/doa", Some("wrong"), r#"{"id": 1, "title": "x"}"#)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unconfigured_key_rejects_everything() {
    let mut app = TestApp::new();
    app.config.admin_api_key = None;

    let (status, _) = app
        .patch("/admin/doa", Some(""), r#"{"id": 1, "title": "x"}"#)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_row_is_404_without_update() {
    let app = TestApp::new();
    let (status, body) = app
        .patch("/admin/doa", Some(ADMIN_KEY), r#"{"id": 999, "title": "x"}"#)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], false);
    assert_eq!(app.fixture.count("SELECT COUNT(*) FROM doa"), 2);
    assert_eq!(app.fixture.count("SELECT COUNT(*) FROM doa WHERE title = 'x'"), 0);
}

#[tokio::test]
async fn test_unknown_row_without_fields_is_404() {
    let app = TestApp::new();
    let (status, body) = app
        .patch("/admin/doa", Some(ADMIN_KEY), r#"{"id": 999}"#)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], false);
    assert_eq!(body["data"], serde_json::json!({}));
    assert_eq!(app.fixture.count("SELECT COUNT(*) FROM doa"), 2);
}

#[tokio::test]
async fn test_patch_without_fields_is_400() {
    let app = TestApp::new();

    let (status, body) = app.patch("/admin/dzikir", Some(ADMIN_KEY), r#"{"id": 1}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "nothing to update");

    let (status, _) = app
        .patch("/admin/dzikir", Some(ADMIN_KEY), r#"{"id": 1, "title": "  "}"#)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_without_key_field_is_400() {
    let app = TestApp::new();
    let (status, _) = app
        .patch("/admin/ayah", Some(ADMIN_KEY), r#"{"surahId": 1, "text": "x"}"#)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let app = TestApp::new();
    let (status, body) = app.patch("/admin/doa", Some(ADMIN_KEY), "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], false);
}

#[tokio::test]
async fn test_ayah_patch_changes_only_supplied_fields() {
    let app = TestApp::new();
    let before = ayah_text(&app, "1", "2");

    let (status, body) = app
        .patch(
            "/admin/ayah",
            Some(ADMIN_KEY),
            r#"{"surahId": "1", "ayahId": 2, "latin": "al-hamdu lillah"}"#,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);
    assert_eq!(body["diff"]["before"]["latin"], before.2.as_str());
    assert_eq!(body["diff"]["after"]["latin"], "al-hamdu lillah");
    assert_eq!(body["diff"]["after"]["text"], before.1.as_str());
    assert!(body["integrity_status"].is_string());

    let after = ayah_text(&app, "1", "2");
    assert_eq!(after.0, before.0);
    assert_eq!(after.1, before.1);
    assert_eq!(after.2, "al-hamdu lillah");
}

#[tokio::test]
async fn test_doa_patch_returns_diff() {
    let app = TestApp::new();
    let (status, body) = app
        .patch(
            "/admin/doa",
            Some(ADMIN_KEY),
            r#"{"id": "1", "translation": "Ya Allah, berkahilah"}"#,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["diff"]["before"]["translation"], "translation 1");
    assert_eq!(body["diff"]["after"]["translation"], "Ya Allah, berkahilah");
    assert_eq!(body["diff"]["after"]["title"], "Doa sebelum makan");
    assert!(body.get("integrity_status").is_none());
}

#[tokio::test]
async fn test_verse_edit_changes_chain_from_that_block() {
    let app = TestApp::new();
    let (_, original) = app.get("/integrity/chain").await;

    let (status, _) = app
        .patch(
            "/admin/ayah",
            Some(ADMIN_KEY),
            r#"{"surahId": 2, "ayahId": 3, "text": "Terjemahan baru"}"#,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, updated) = app.get("/integrity/chain").await;
    let (old, new) = (
        original["chain"].as_array().unwrap(),
        updated["chain"].as_array().unwrap(),
    );

    assert_eq!(old[0]["hash"], new[0]["hash"]);
    assert_ne!(old[1]["content_hash"], new[1]["content_hash"]);
    assert_ne!(old[1]["hash"], new[1]["hash"]);
    assert_eq!(old[2]["content_hash"], new[2]["content_hash"]);
    assert_ne!(old[2]["hash"], new[2]["hash"]);
    assert_ne!(original["root_hash"], updated["root_hash"]);
}
