//! `/tools/*`.

use crate::Error;
use crate::models::{ZakatKind, ZakatRequest};
use crate::server::AppState;
use crate::server::params::Params;
use crate::server::response::{ApiResult, success};
use crate::services::tools::{self, DEFAULT_GOLD_PRICE, DEFAULT_RICE_PRICE};
use axum::Router;
use axum::extract::State;
use axum::routing::get;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tools/qibla", get(qibla))
        .route("/tools/zakat", get(zakat))
        .route("/tools/quotes/daily", get(daily_quotes))
        .route("/tools/semantic-search", get(semantic_search))
}

async fn qibla(params: Params) -> ApiResult {
    let (Some(lat), Some(lng)) = (params.number("lat")?, params.number("lng")?) else {
        return Err(Error::InvalidInput("lat and lng are required".to_string()).into());
    };
    success("Qibla direction computed.", tools::qibla(lat, lng)?)
}

fn zakat_request(params: &Params) -> Result<ZakatRequest, Error> {
    let kind = params.require(&["type"], "type (maal, penghasilan or fitrah) is required")?;
    let kind = ZakatKind::parse(kind).ok_or_else(|| {
        Error::InvalidInput("type must be one of maal, penghasilan or fitrah".to_string())
    })?;
    let amount = params
        .number("amount")?
        .ok_or_else(|| Error::InvalidInput("amount must be a number greater than 0".to_string()))?;
    let people = params
        .get("jumlahOrang")
        .map(|raw| {
            raw.parse::<u32>()
                .map_err(|_| Error::InvalidInput("jumlahOrang must be a whole number".to_string()))
        })
        .transpose()?
        .unwrap_or(1);

    Ok(ZakatRequest {
        kind,
        amount,
        gold_price: params.number("hargaEmas")?.unwrap_or(DEFAULT_GOLD_PRICE),
        rice_price: params.number("hargaBeras")?.unwrap_or(DEFAULT_RICE_PRICE),
        people,
    })
}

async fn zakat(params: Params) -> ApiResult {
    let request = zakat_request(&params)?;
    success("Zakat calculated.", tools::zakat(&request)?)
}

async fn daily_quotes(State(state): State<AppState>) -> ApiResult {
    success(
        "Daily quotes retrieved.",
        state.services.tools().daily_quotes().await?,
    )
}

async fn semantic_search(State(state): State<AppState>, params: Params) -> ApiResult {
    let query = params.require(&["query"], "query is required")?;
    let data = state.services.tools().keyword_search(query).await?;
    success(format!("Search results for '{query}' retrieved."), data)
}
