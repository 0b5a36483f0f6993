//! `/kemenag/*`: holidays, the pesantren directory and mosques.

use crate::Error;
use crate::models::{MasjidFilter, NearbyQuery};
use crate::server::AppState;
use crate::server::params::{Params, Segments};
use crate::server::response::{ApiResult, success};
use crate::services::geo::validate_radius;
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use chrono::Datelike;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/kemenag/libur", get(holidays))
        .route("/kemenag/provinsi", get(provinces))
        .route("/kemenag/kabupaten", get(regencies))
        .route("/kemenag/pesantren", get(pesantren))
        .route("/kemenag/masjid", get(masjid_search))
        .route("/kemenag/masjid/detail", get(masjid_detail))
        .route("/kemenag/masjid/nearby", get(masjid_nearby))
        .route("/kemenag/masjid/{id}", get(masjid_by_path))
}

async fn holidays(State(state): State<AppState>, params: Params) -> ApiResult {
    let year = params
        .get("year")
        .map_or_else(|| chrono::Local::now().year().to_string(), ToString::to_string);
    let data = state.services.kemenag().holidays(&year).await?;
    success(format!("Holidays of {year} retrieved."), data)
}

async fn provinces(State(state): State<AppState>) -> ApiResult {
    success(
        "Province list retrieved.",
        state.services.kemenag().provinces().await?,
    )
}

async fn regencies(State(state): State<AppState>, params: Params) -> ApiResult {
    let provinsi = params.require(&["provinsiId"], "provinsiId is required")?;
    let data = state.services.kemenag().regencies(provinsi).await?;
    success(format!("Regencies of province {provinsi} retrieved."), data)
}

async fn pesantren(State(state): State<AppState>, params: Params) -> ApiResult {
    let kabupaten = params.require(&["kabupatenId"], "kabupatenId is required")?;
    let data = state.services.kemenag().pesantren(kabupaten).await?;
    success(format!("Pesantren of regency {kabupaten} retrieved."), data)
}

async fn masjid_search(State(state): State<AppState>, params: Params) -> ApiResult {
    let owned = |name| params.get(name).map(ToString::to_string);
    let filter = MasjidFilter {
        search: owned("search"),
        lokasi: owned("lokasi"),
        jenis: owned("jenis"),
        tipologi: owned("tipologi"),
    };

    let data = state.services.masjid().search(&filter).await?;
    if filter.is_empty() {
        success("Mosque list retrieved.", data)
    } else {
        success("Mosques matching the criteria retrieved.", data)
    }
}

async fn masjid_detail(State(state): State<AppState>, params: Params) -> ApiResult {
    let id = params.require(&["id"], "id is required")?;
    success(
        "Mosque detail retrieved.",
        state.services.masjid().get(id).await?,
    )
}

async fn masjid_by_path(
    State(state): State<AppState>,
    Segments(id): Segments<String>,
) -> ApiResult {
    success(
        "Mosque detail retrieved.",
        state.services.masjid().get(id.trim()).await?,
    )
}

async fn masjid_nearby(State(state): State<AppState>, params: Params) -> ApiResult {
    let (Some(lat), Some(lng)) = (params.number("lat")?, params.number("lng")?) else {
        return Err(Error::InvalidInput("lat and lng are required".to_string()).into());
    };
    let radius_km = validate_radius(params.number("radius")?)?;

    let data = state
        .services
        .masjid()
        .nearby(&NearbyQuery {
            lat,
            lng,
            radius_km,
        })
        .await?;
    success(format!("Mosques within {radius_km} km retrieved."), data)
}
