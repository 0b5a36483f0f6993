//! Hadith resolvers: the local Arbain collection and the proxied book API.

use super::upstream::{UpstreamClient, UpstreamResponse};
use crate::models::Hadith;
use crate::storage::sqlite::{contains_pattern, key, text};
use crate::storage::{SqlValue, Store};
use crate::{Error, Result};
use rusqlite::Row;
use serde_json::Value;
use tracing::instrument;

pub(crate) fn hadith_from_row(row: &Row<'_>) -> rusqlite::Result<Hadith> {
    Ok(Hadith {
        no: key(row, "no")?,
        judul: text(row, "judul")?,
        arab: text(row, "arab")?,
        indo: text(row, "indo")?,
    })
}

/// Unwraps a hadith API envelope.
///
/// A failing HTTP status is relayed. A success status whose body carries a
/// `code` other than 200 is reported without a status (mapped to 502).
/// On success the `data` field is returned, or the whole body without one.
fn unwrap_book_response(response: UpstreamResponse) -> Result<Value> {
    let body_code = response.body.get("code").and_then(Value::as_i64);
    let body_failed = body_code.is_some_and(|code| code != 200);

    if !response.is_success() || body_failed {
        let message = response.message().unwrap_or("Unknown error").to_string();
        return Err(Error::Upstream {
            status: (!response.is_success()).then_some(response.status),
            message,
        });
    }

    let UpstreamResponse { body, .. } = response;
    Ok(match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if !data.is_null() => data,
            _ => Value::Object(map),
        },
        other => other,
    })
}

/// Hadith lookups.
#[derive(Debug, Clone)]
pub struct HadithService {
    store: Store,
    upstream: UpstreamClient,
}

impl HadithService {
    /// Creates a new hadith service.
    #[must_use]
    pub const fn new(store: Store, upstream: UpstreamClient) -> Self {
        Self { store, upstream }
    }

    /// Lists the Arbain collection in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn arbain(&self) -> Result<Vec<Hadith>> {
        self.store
            .query_many(
                "hadith_list",
                "SELECT * FROM hadits ORDER BY CAST(no AS INTEGER)",
                vec![],
                hadith_from_row,
            )
            .await
    }

    /// Returns one Arbain hadith.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when missing.
    #[instrument(skip(self))]
    pub async fn hadith(&self, number: &str) -> Result<Hadith> {
        self.store
            .query_one(
                "hadith_get",
                "SELECT * FROM hadits WHERE no = ?1",
                vec![SqlValue::Text(number.to_string())],
                hadith_from_row,
            )
            .await?
            .ok_or_else(|| Error::NotFound(format!("hadith {number} not found")))
    }

    /// Finds Arbain hadith whose title contains `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn find_hadith(&self, query: &str) -> Result<Vec<Hadith>> {
        self.store
            .query_many(
                "hadith_find",
                "SELECT * FROM hadits WHERE judul LIKE ?1 ESCAPE '\\' ORDER BY CAST(no AS INTEGER)",
                vec![SqlValue::Text(contains_pattern(query))],
                hadith_from_row,
            )
            .await
    }

    /// Lists the hadith books of the upstream API.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] when the upstream reports a failure and
    /// [`Error::OperationFailed`] on transport errors.
    #[instrument(skip(self))]
    pub async fn books(&self) -> Result<Value> {
        let url = UpstreamClient::url(&self.upstream.config().hadith_base_url, &["books"])?;
        let response = self.upstream.get_json("hadith_books", url, None).await?;
        unwrap_book_response(response)
    }

    /// Lists the hadith of one book, optionally limited to a range like `1-50`.
    ///
    /// # Errors
    ///
    /// Same as [`HadithService::books`].
    #[instrument(skip(self))]
    pub async fn book(&self, name: &str, range: Option<&str>) -> Result<Value> {
        let mut url =
            UpstreamClient::url(&self.upstream.config().hadith_base_url, &["books", name])?;
        if let Some(range) = range {
            url.query_pairs_mut().append_pair("range", range);
        }
        let response = self.upstream.get_json("hadith_book", url, None).await?;
        unwrap_book_response(response)
    }

    /// Returns one hadith of a book by number.
    ///
    /// # Errors
    ///
    /// Same as [`HadithService::books`].
    #[instrument(skip(self))]
    pub async fn book_hadith(&self, name: &str, number: &str) -> Result<Value> {
        let url = UpstreamClient::url(
            &self.upstream.config().hadith_base_url,
            &["books", name, number],
        )?;
        let response = self.upstream.get_json("hadith_book_number", url, None).await?;
        unwrap_book_response(response)
    }
}
