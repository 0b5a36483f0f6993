//! `/`, `/health`, `/metrics` and the JSON 404 fallback.

use crate::Error;
use crate::observability::render_metrics;
use crate::server::AppState;
use crate::server::response::{ApiError, ApiResult, success};
use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::IntoResponse;
use axum::routing::get;
use serde_json::json;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
}

async fn index() -> ApiResult {
    success(
        "Muslim API",
        json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

async fn health(State(state): State<AppState>) -> ApiResult {
    let available = state.services.store().is_available();
    let body = json!({
        "status": available,
        "message": if available { "ok" } else { "database unavailable" },
        "data": {
            "store": if available { "available" } else { "unavailable" },
            "environment": state.environment.as_str(),
            "version": env!("CARGO_PKG_VERSION"),
        },
    });
    let status = if available {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    Ok((status, Json(body)).into_response())
}

async fn metrics(State(state): State<AppState>) -> ApiResult {
    let Some(handle) = state.metrics.as_ref() else {
        return Err(ApiError(Error::NotFound("metrics are disabled".to_string())));
    };
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        render_metrics(handle),
    )
        .into_response())
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError(Error::NotFound(format!("route {} not found", uri.path())))
}
