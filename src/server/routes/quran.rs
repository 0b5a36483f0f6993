//! `/surah`, `/ayah/*`, `/tafsir`, `/theme`, `/asbab`.

use crate::Error;
use crate::server::AppState;
use crate::server::params::Params;
use crate::server::response::{ApiResult, success};
use axum::Router;
use axum::extract::State;
use axum::routing::get;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/surah", get(surah))
        .route("/ayah", get(ayahs))
        .route("/ayah/range", get(ayah_range))
        .route("/ayah/surah", get(ayahs_by_surah))
        .route("/ayah/juz", get(ayahs_by_juz))
        .route("/ayah/page", get(ayahs_by_page))
        .route("/ayah/specific", get(ayah_specific))
        .route("/ayah/find", get(find_ayahs))
        .route("/tafsir", get(tafsir))
        .route("/theme", get(theme))
        .route("/asbab", get(asbab))
}

async fn surah(State(state): State<AppState>, params: Params) -> ApiResult {
    let quran = state.services.quran();
    match params.first(&["surahId", "id"]) {
        Some(number) => success("Surah detail retrieved.", quran.surah(number).await?),
        None => success("Surah list retrieved.", quran.surahs().await?),
    }
}

async fn ayahs(State(state): State<AppState>) -> ApiResult {
    success("All ayahs retrieved.", state.services.quran().ayahs().await?)
}

async fn ayah_range(State(state): State<AppState>, params: Params) -> ApiResult {
    let message = "surahId, start and end are required";
    let surah = params.require(&["surahId", "id"], message)?;
    let start = params.require(&["start"], message)?;
    let end = params.require(&["end"], message)?;

    let data = state.services.quran().ayah_range(surah, start, end).await?;
    success(
        format!("Ayahs {start}-{end} of surah {surah} retrieved."),
        data,
    )
}

async fn ayahs_by_surah(State(state): State<AppState>, params: Params) -> ApiResult {
    let surah = params.require(&["surahId", "id"], "surahId is required")?;
    let data = state.services.quran().ayahs_by_surah(surah).await?;
    success(format!("Ayahs of surah {surah} retrieved."), data)
}

async fn ayahs_by_juz(State(state): State<AppState>, params: Params) -> ApiResult {
    let juz = params.require(&["juzId", "id"], "juzId is required")?;
    let data = state.services.quran().ayahs_by_juz(juz).await?;
    success(format!("Ayahs of juz {juz} retrieved."), data)
}

async fn ayahs_by_page(State(state): State<AppState>, params: Params) -> ApiResult {
    let page = params.require(&["page", "id"], "page is required")?;
    let data = state.services.quran().ayahs_by_page(page).await?;
    success(format!("Ayahs of page {page} retrieved."), data)
}

async fn ayah_specific(State(state): State<AppState>, params: Params) -> ApiResult {
    let message = "surahId and ayahId are required";
    let surah = params.require(&["surahId", "id"], message)?;
    let ayah = params.require(&["ayahId"], message)?;

    let data = state.services.quran().ayah(surah, ayah).await?;
    success(format!("Ayah {ayah} of surah {surah} retrieved."), data)
}

async fn find_ayahs(State(state): State<AppState>, params: Params) -> ApiResult {
    // The length rule counts the value as sent, surrounding spaces included.
    let query = params
        .raw("query")
        .filter(|query| !query.is_empty())
        .ok_or_else(|| Error::InvalidInput("query is required".to_string()))?;
    let data = state.services.quran().find_ayahs(query).await?;
    success(format!("Ayahs matching '{query}' retrieved."), data)
}

async fn tafsir(State(state): State<AppState>, params: Params) -> ApiResult {
    let quran = state.services.quran();
    match params.first(&["surahId", "id"]) {
        Some(surah) => success("Tafsir detail retrieved.", quran.tafsir(surah).await?),
        None => success("Tafsir list retrieved.", quran.tafsirs().await?),
    }
}

async fn theme(State(state): State<AppState>, params: Params) -> ApiResult {
    let quran = state.services.quran();
    match params.first(&["themeId", "id"]) {
        Some(id) => success("Theme detail retrieved.", quran.theme(id).await?),
        None => success("Theme list retrieved.", quran.themes().await?),
    }
}

async fn asbab(State(state): State<AppState>, params: Params) -> ApiResult {
    let quran = state.services.quran();
    match params.first(&["asbabId", "id"]) {
        Some(id) => success("Asbab al-nuzul detail retrieved.", quran.asbab(id).await?),
        None => success("Asbab al-nuzul list retrieved.", quran.asbab_list().await?),
    }
}
