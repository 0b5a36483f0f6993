//! `/integrity/*`.

use crate::server::AppState;
use crate::server::params::Params;
use crate::server::response::{ApiResult, success, success_flat};
use axum::Router;
use axum::extract::State;
use axum::routing::get;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/integrity/chain", get(chain))
        .route("/integrity/verify", get(verify))
        .route("/integrity/verify/ayah", get(verify_ayah))
}

async fn chain(State(state): State<AppState>) -> ApiResult {
    success_flat(
        "Data integrity chain built.",
        state.services.integrity().chain().await?,
    )
}

async fn verify(State(state): State<AppState>) -> ApiResult {
    let report = state.services.integrity().quick_verify().await;
    success_flat(report.message.clone(), report)
}

async fn verify_ayah(State(state): State<AppState>, params: Params) -> ApiResult {
    let message = "surahId and ayahId are required";
    let surah = params.require(&["surahId"], message)?;
    let ayah = params.require(&["ayahId"], message)?;

    let data = state.services.integrity().verify_ayah(surah, ayah).await?;
    success(
        format!("Integrity of ayah {ayah} of surah {surah} verified."),
        data,
    )
}
