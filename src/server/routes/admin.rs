//! `PATCH /admin/{ayah,dzikir,doa}`. Mounted behind [`crate::server::auth::admin_gate`].

use crate::Error;
use crate::models::{AyahPatch, TextPatch};
use crate::server::AppState;
use crate::server::response::{ApiResult, success_flat};
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::patch;
use serde::de::DeserializeOwned;
use serde_json::json;

/// Note returned with verse edits.
const INTEGRITY_NOTE: &str = "Hashes are recomputed on the next integrity check.";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ayah", patch(update_ayah))
        .route("/dzikir", patch(update_dzikir))
        .route("/doa", patch(update_doa))
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|e| Error::InvalidInput(format!("invalid JSON body: {e}")))
}

async fn update_ayah(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let patch: AyahPatch = parse_body(&body)?;
    let diff = state.services.admin().update_ayah(&patch).await?;
    success_flat(
        "Ayah updated.",
        json!({ "diff": diff, "integrity_status": INTEGRITY_NOTE }),
    )
}

async fn update_dzikir(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let patch: TextPatch = parse_body(&body)?;
    let diff = state.services.admin().update_dzikir(&patch).await?;
    success_flat("Dzikir updated.", json!({ "diff": diff }))
}

async fn update_doa(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let patch: TextPatch = parse_body(&body)?;
    let diff = state.services.admin().update_doa(&patch).await?;
    success_flat("Doa updated.", json!({ "diff": diff }))
}
