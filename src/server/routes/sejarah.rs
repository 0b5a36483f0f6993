//! `/sejarah`, `/sejarah/detail`, `/sejarah/today`.

use crate::server::AppState;
use crate::server::params::Params;
use crate::server::response::{ApiResult, success};
use axum::Router;
use axum::extract::State;
use axum::routing::get;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sejarah", get(list))
        .route("/sejarah/detail", get(detail))
        .route("/sejarah/today", get(today))
}

async fn list(State(state): State<AppState>, params: Params) -> ApiResult {
    let kategori = params.get("kategori");
    let data = state.services.sejarah().list(kategori).await?;
    match kategori {
        Some(kategori) => success(format!("History of category {kategori} retrieved."), data),
        None => success("History list retrieved.", data),
    }
}

async fn detail(State(state): State<AppState>, params: Params) -> ApiResult {
    let id = params.require(&["id"], "id is required")?;
    success(
        "History detail retrieved.",
        state.services.sejarah().detail(id).await?,
    )
}

async fn today(State(state): State<AppState>) -> ApiResult {
    let date = chrono::Local::now().date_naive();
    let data = state.services.sejarah().on_date(date).await?;
    success(format!("Events for today ({}) retrieved.", data.today), data)
}
