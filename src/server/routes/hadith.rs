//! `/hadits`, `/hadits/find` and the proxied `/hadits/books/*`.

use crate::server::AppState;
use crate::server::params::{Params, Segments};
use crate::server::response::{ApiResult, success};
use axum::Router;
use axum::extract::State;
use axum::routing::get;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/hadits", get(arbain))
        .route("/hadits/find", get(find))
        .route("/hadits/books", get(books))
        .route("/hadits/books/{name}", get(book))
        .route("/hadits/books/{name}/{number}", get(book_hadith))
}

async fn arbain(State(state): State<AppState>, params: Params) -> ApiResult {
    let hadith = state.services.hadith();
    match params.get("nomor") {
        Some(number) => success("Arbain hadith detail retrieved.", hadith.hadith(number).await?),
        None => success("Arbain hadith list retrieved.", hadith.arbain().await?),
    }
}

async fn find(State(state): State<AppState>, params: Params) -> ApiResult {
    let query = params.require(&["query"], "query is required")?;
    let data = state.services.hadith().find_hadith(query).await?;
    success(format!("Hadith matching '{query}' retrieved."), data)
}

async fn books(State(state): State<AppState>) -> ApiResult {
    success(
        "Hadith books retrieved.",
        state.services.hadith().books().await?,
    )
}

async fn book(
    State(state): State<AppState>,
    Segments(name): Segments<String>,
    params: Params,
) -> ApiResult {
    let data = state
        .services
        .hadith()
        .book(&name, params.get("range"))
        .await?;
    success(format!("Hadith of book {name} retrieved."), data)
}

async fn book_hadith(
    State(state): State<AppState>,
    Segments((name, number)): Segments<(String, String)>,
) -> ApiResult {
    let data = state.services.hadith().book_hadith(&name, &number).await?;
    success(format!("Hadith {number} of book {name} retrieved."), data)
}
