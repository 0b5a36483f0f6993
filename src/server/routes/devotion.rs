//! `/asma`, `/dzikir`, `/doa`.

use crate::server::AppState;
use crate::server::params::Params;
use crate::server::response::{ApiResult, success};
use axum::Router;
use axum::extract::State;
use axum::routing::get;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/asma", get(asma))
        .route("/dzikir", get(dzikir))
        .route("/doa", get(doa))
}

async fn asma(State(state): State<AppState>, params: Params) -> ApiResult {
    let devotion = state.services.devotion();
    match params.first(&["asmaId", "id"]) {
        Some(id) => success("Asmaul husna detail retrieved.", devotion.asma(id).await?),
        None => success("Asmaul husna list retrieved.", devotion.asma_list().await?),
    }
}

async fn dzikir(State(state): State<AppState>, params: Params) -> ApiResult {
    let kind = params.get("type");
    let data = state.services.devotion().dzikir(kind).await?;
    match kind {
        Some(kind) => success(format!("Dzikir of type {kind} retrieved."), data),
        None => success("Dzikir list retrieved.", data),
    }
}

async fn doa(State(state): State<AppState>, params: Params) -> ApiResult {
    let devotion = state.services.devotion();
    if let Some(id) = params.get("id") {
        return success("Doa detail retrieved.", devotion.doa(id).await?);
    }

    let category = params.get("category");
    let data = devotion.doa_list(category).await?;
    match category {
        Some(category) => success(format!("Doa of category {category} retrieved."), data),
        None => success("Doa list retrieved.", data),
    }
}
