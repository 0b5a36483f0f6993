//! `/murotal`, `/murotal/qari`.

use crate::server::AppState;
use crate::server::params::Params;
use crate::server::response::{ApiResult, success, success_flat};
use crate::services::DEFAULT_QARI_ID;
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use serde_json::json;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/murotal/qari", get(qaris))
        .route("/murotal", get(murotal))
}

async fn qaris(State(state): State<AppState>) -> ApiResult {
    success("Reciter list retrieved.", state.services.quran().qaris().await?)
}

async fn murotal(State(state): State<AppState>, params: Params) -> ApiResult {
    let qari_id = params.get("qariId").unwrap_or(DEFAULT_QARI_ID);
    let quran = state.services.quran();

    if let Some(surah) = params.get("surahId") {
        let entry = quran.murotal_surah(qari_id, surah).await?;
        return success(format!("Recitation of surah {surah} retrieved."), entry);
    }

    let playlist = quran.murotal_playlist(qari_id).await?;
    success_flat(
        format!("Recitations by reciter {qari_id} retrieved."),
        json!({ "qari": playlist.qari, "data": playlist.surahs }),
    )
}
