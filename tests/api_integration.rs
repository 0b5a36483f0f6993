//! End-to-end tests of the read-only API over a seeded database.
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::float_cmp)]

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{SURAH_2_VERSES, TestApp};
use serde_json::Value;
use tower::ServiceExt;

fn numbers(list: &Value, field: &str) -> Vec<String> {
    list.as_array()
        .expect("array")
        .iter()
        .map(|item| item[field].as_str().expect("string field").to_string())
        .collect()
}

#[tokio::test]
async fn test_specific_ayah() {
    let app = TestApp::new();
    let (status, body) = app.get("/ayah/specific?surahId=1&ayahId=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);
    assert_eq!(body["data"]["surah"], "1");
    assert_eq!(body["data"]["ayah"], "1");
    assert_eq!(
        body["data"]["text"],
        "Dengan nama Allah Yang Maha Pengasih, Maha Penyayang."
    );
    assert_eq!(
        body["data"]["audio_partial"]["05"],
        "https://cdn.example.test/partial.mp3"
    );
}

#[tokio::test]
async fn test_specific_ayah_missing_is_404_with_empty_data() {
    let app = TestApp::new();
    let (status, body) = app.get("/ayah/specific?surahId=1&ayahId=99").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], false);
    assert!(body["data"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_specific_ayah_requires_both_keys() {
    let app = TestApp::new();
    let (status, body) = app.get("/ayah/specific?surahId=1").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], false);
    assert!(body["message"].as_str().unwrap().contains("ayahId"));
}

#[tokio::test]
async fn test_surah_list_is_numerically_ordered() {
    let app = TestApp::new();
    let (status, body) = app.get("/surah").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(numbers(&body["data"], "number"), ["1", "2", "3"]);

    let (_, detail) = app.get("/surah?surahId=2").await;
    assert_eq!(detail["data"]["name_id"], "Al-Baqarah");
}

#[tokio::test]
async fn test_ayah_range_orders_numerically() {
    let app = TestApp::new();
    let (status, body) = app.get("/ayah/range?surahId=2&start=8&end=11").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(numbers(&body["data"], "ayah"), ["8", "9", "10", "11"]);
}

#[tokio::test]
async fn test_ayah_range_inverted_is_empty() {
    let app = TestApp::new();
    let (status, body) = app.get("/ayah/range?surahId=2&start=5&end=2").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_ayah_range_rejects_non_numeric_bounds() {
    let app = TestApp::new();
    let (status, _) = app.get("/ayah/range?surahId=2&start=one&end=3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ayahs_by_surah_juz_and_page() {
    let app = TestApp::new();

    let (_, by_surah) = app.get("/ayah/surah?id=2").await;
    assert_eq!(
        by_surah["data"].as_array().unwrap().len(),
        usize::try_from(SURAH_2_VERSES).unwrap()
    );

    let (_, by_page) = app.get("/ayah/page?page=1").await;
    assert_eq!(by_page["data"].as_array().unwrap().len(), 7);

    let (_, by_juz) = app.get("/ayah/juz?juzId=1").await;
    assert_eq!(by_juz["data"].as_array().unwrap().len(), 7 + 12);
}

#[tokio::test]
async fn test_find_ayah() {
    let app = TestApp::new();

    let (status, body) = app.get("/ayah/find?query=Pengasih").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(numbers(&body["data"], "id"), ["1"]);

    let (status, _) = app.get("/ayah/find?query=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_find_ayah_counts_surrounding_spaces() {
    let app = TestApp::new();

    let (status, body) = app.get("/ayah/find?query=%20ab%20").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = app.get("/ayah/find?query=%20Maha%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(numbers(&body["data"], "id"), ["1"]);

    let (status, _) = app.get("/ayah/find?query=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tafsir_theme_and_asbab() {
    let app = TestApp::new();

    let (_, tafsir) = app.get("/tafsir?surahId=1").await;
    assert_eq!(tafsir["data"]["tafsir"], "Tafsir Al-Fatihah");

    let (_, themes) = app.get("/theme").await;
    assert_eq!(themes["data"].as_array().unwrap().len(), 2);

    let (_, asbab) = app.get("/asbab?id=1").await;
    assert_eq!(asbab["data"]["surah"], "2");

    let (status, _) = app.get("/theme?themeId=42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_devotion_lists() {
    let app = TestApp::new();

    let (_, asma) = app.get("/asma").await;
    assert_eq!(asma["data"].as_array().unwrap().len(), 2);

    let (_, pagi) = app.get("/dzikir?type=pagi").await;
    assert_eq!(numbers(&pagi["data"], "id"), ["1"]);
    assert_eq!(pagi["data"][0]["type"], "pagi");

    let (_, doa) = app.get("/doa?id=2").await;
    assert_eq!(doa["data"]["title"], "Doa bepergian");
}

#[tokio::test]
async fn test_arbain_hadith() {
    let app = TestApp::new();

    let (_, list) = app.get("/hadits").await;
    assert_eq!(numbers(&list["data"], "no"), ["1", "2", "10"]);

    let (_, one) = app.get("/hadits?nomor=1").await;
    assert_eq!(one["data"]["judul"], "Niat");

    let (_, found) = app.get("/hadits/find?query=iman").await;
    assert_eq!(numbers(&found["data"], "no"), ["2"]);
}

#[tokio::test]
async fn test_masjid_search_and_detail() {
    let app = TestApp::new();

    let (_, all) = app.get("/kemenag/masjid").await;
    assert_eq!(all["data"].as_array().unwrap().len(), 4);

    let (_, jakarta) = app.get("/kemenag/masjid?lokasi=Jakarta").await;
    assert_eq!(numbers(&jakarta["data"], "id"), ["1", "2"]);

    let (_, literal) = app.get("/kemenag/masjid?search=100%25").await;
    assert_eq!(numbers(&literal["data"], "id"), ["1"]);

    let (_, by_query) = app.get("/kemenag/masjid/detail?id=3").await;
    let (_, by_path) = app.get("/kemenag/masjid/3").await;
    assert_eq!(by_query["data"], by_path["data"]);
    assert_eq!(by_path["data"]["nama"], "Masjid Raya Bandung");
}

#[tokio::test]
async fn test_masjid_filters_are_combined() {
    let app = TestApp::new();

    let (_, body) = app.get("/kemenag/masjid?lokasi=Jakarta&tipologi=Raya").await;
    assert_eq!(numbers(&body["data"], "id"), ["2"]);

    let (_, body) = app.get("/kemenag/masjid?search=Masjid&lokasi=Bandung").await;
    assert_eq!(numbers(&body["data"], "id"), ["3"]);

    let (status, body) = app.get("/kemenag/masjid?lokasi=Bandung&jenis=Mushalla").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_masjid_jenis_and_tipologi_match_exactly() {
    let app = TestApp::new();

    let (_, body) = app.get("/kemenag/masjid?jenis=Mushalla").await;
    assert_eq!(numbers(&body["data"], "id"), ["4"]);

    let (_, body) = app.get("/kemenag/masjid?jenis=Mush").await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (_, body) = app.get("/kemenag/masjid?tipologi=Raya").await;
    assert_eq!(numbers(&body["data"], "id"), ["2", "3"]);

    let (_, body) = app.get("/kemenag/masjid?tipologi=raya").await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_nearby_masjid_returns_at_most_twenty() {
    let app = TestApp::new();
    let conn = app.fixture.connection();
    for id in 100..130 {
        conn.execute(
            "INSERT INTO masjid (id, nama, deskripsi, lokasi, latitude, longitude, jenis, tipologi) \
             VALUES (?1, 'Masjid Kampung', '', 'Yogyakarta', -7.7956, 110.3695, 'Masjid', 'Jami')",
            [id.to_string()],
        )
        .unwrap();
    }
    drop(conn);

    let (status, body) = app
        .get("/kemenag/masjid/nearby?lat=-7.7956&lng=110.3695&radius=1")
        .await;

    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 20);
    assert!(data.iter().all(|m| m["distance"].as_f64().unwrap() == 0.0));
}

#[tokio::test]
async fn test_undecodable_path_segment_is_json_400() {
    let app = TestApp::new();

    for uri in ["/kemenag/masjid/%FF", "/hadits/books/%FF", "/hadits/books/%FF/1"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["status"], false, "{uri}");
        assert!(body["message"].is_string(), "{uri}");
    }
}

#[tokio::test]
async fn test_nearby_masjid_sorted_by_distance() {
    let app = TestApp::new();
    let (status, body) = app
        .get("/kemenag/masjid/nearby?lat=-6.1702&lng=106.8310&radius=5")
        .await;

    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(numbers(&body["data"], "id"), ["1", "2"]);
    assert_eq!(data[0]["distance"].as_f64().unwrap(), 0.0);
    assert!(data[1]["distance"].as_f64().unwrap() > 3.0);
    assert!(data[1]["distance"].as_f64().unwrap() < 4.0);
}

#[tokio::test]
async fn test_nearby_masjid_empty_area() {
    let app = TestApp::new();
    let (status, body) = app.get("/kemenag/masjid/nearby?lat=0&lng=0&radius=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_nearby_masjid_rejects_bad_coordinates() {
    let app = TestApp::new();

    let (status, _) = app.get("/kemenag/masjid/nearby?lat=north&lng=106").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/kemenag/masjid/nearby?lat=-6").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .get("/kemenag/masjid/nearby?lat=-6&lng=106&radius=-1")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_murotal_playlist_and_single_surah() {
    let app = TestApp::new();

    let (status, playlist) = app.get("/murotal").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(playlist["qari"]["id"], "05");
    assert_eq!(playlist["data"].as_array().unwrap().len(), 3);
    assert_eq!(
        playlist["data"][0]["audio_url"],
        "https://cdn.example.test/05/1.mp3"
    );

    let (_, other) = app.get("/murotal?qariId=01").await;
    assert!(other["data"][0]["audio_url"].is_null());

    let (_, single) = app.get("/murotal?surahId=2").await;
    assert_eq!(single["data"]["surahId"], "2");
    assert_eq!(single["data"]["qariId"], "05");

    let (_, qaris) = app.get("/murotal/qari").await;
    assert_eq!(numbers(&qaris["data"], "id"), ["01", "05"]);
}

#[tokio::test]
async fn test_sejarah() {
    let app = TestApp::new();

    let (_, all) = app.get("/sejarah").await;
    assert_eq!(all["data"].as_array().unwrap().len(), 3);

    let (_, merdeka) = app.get("/sejarah?kategori=Kemerdekaan").await;
    assert_eq!(numbers(&merdeka["data"], "id"), ["1", "3"]);

    let (status, _) = app.get("/sejarah/detail?id=9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, today) = app.get("/sejarah/today").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!today["data"]["today"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_tools() {
    let app = TestApp::new();

    let (_, qibla) = app.get("/tools/qibla?lat=-6.1702&lng=106.8310").await;
    let bearing = qibla["data"]["qibla_direction"].as_f64().unwrap();
    assert!((294.0..296.0).contains(&bearing));

    let (_, zakat) = app.get("/tools/zakat?type=fitrah&amount=1&jumlahOrang=2").await;
    assert_eq!(zakat["data"]["zakat"].as_f64().unwrap(), 75_000.0);

    let (status, _) = app.get("/tools/zakat?type=maal").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, quotes) = app.get("/tools/quotes/daily").await;
    assert!(
        quotes["data"]["ayat"]["sumber"]
            .as_str()
            .unwrap()
            .starts_with("QS. ")
    );

    let (_, search) = app.get("/tools/semantic-search?query=Allah").await;
    assert_eq!(search["data"]["query"], "Allah");
    assert!(!search["data"]["quran"].as_array().unwrap().is_empty());
    assert!(!search["data"]["hadits"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_integrity_chain_links_blocks() {
    let app = TestApp::new();
    let (status, body) = app.get("/integrity/chain").await;

    assert_eq!(status, StatusCode::OK);
    let chain = body["chain"].as_array().unwrap();
    assert_eq!(chain.len(), 3);
    assert_eq!(chain[0]["previous_hash"], "0".repeat(64));
    assert_eq!(chain[1]["previous_hash"], chain[0]["hash"]);
    assert_eq!(body["root_hash"], chain[2]["hash"]);

    let (_, again) = app.get("/integrity/chain").await;
    assert_eq!(again["root_hash"], body["root_hash"]);
}

#[tokio::test]
async fn test_quick_verify_is_healthy() {
    let app = TestApp::new();
    let (status, body) = app.get("/integrity/verify").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);
    assert_eq!(body["integrity"], "Healthy");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new();
    let (status, body) = app.get("/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], false);
}

#[tokio::test]
async fn test_health_and_request_id() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-123");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");

    let (_, body) = app.get("/health").await;
    assert_eq!(body["data"]["store"], "available");
}

#[tokio::test]
async fn test_health_reports_unavailable_store() {
    let mut app = TestApp::new();
    app.config = app
        .config
        .clone()
        .with_database_path(app.fixture.dir.path().join("missing").join("none.db"));
    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], false);

    let (status, body) = app.get("/surah").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], false);
}
