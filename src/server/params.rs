//! Request extractors.
//!
//! Query parameters that are present but blank count as absent. Both
//! extractors reject malformed input with the JSON error envelope.

use crate::Error;
use crate::server::response::ApiError;
use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Raw query parameters of a request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Params(HashMap<String, String>);

impl Params {
    /// Returns the trimmed value of the first non-blank name in `names`.
    #[must_use]
    pub fn first(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|name| self.0.get(*name))
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
    }

    /// Returns the value of `name` exactly as sent, blank or not.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns the trimmed, non-blank value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.first(&[name])
    }

    /// Like [`Params::first`], failing with `message` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when none of `names` is set.
    pub fn require(&self, names: &[&str], message: &str) -> Result<&str, Error> {
        self.first(names)
            .ok_or_else(|| Error::InvalidInput(message.to_string()))
    }

    /// Parses `name` as a finite number when set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the value is not a finite number.
    pub fn number(&self, name: &str) -> Result<Option<f64>, Error> {
        self.get(name)
            .map(|raw| {
                raw.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| Error::InvalidInput(format!("{name} must be a number")))
            })
            .transpose()
    }
}

impl<S> FromRequestParts<S> for Params
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<Self>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError(Error::InvalidInput(rejection.body_text())))?;
        Ok(params)
    }
}

/// Path parameters; a segment that fails to decode is a 400 envelope.
#[derive(Debug, Clone)]
pub struct Segments<T>(pub T);

impl<T, S> FromRequestParts<S> for Segments<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError(Error::InvalidInput(rejection.body_text())))?;
        Ok(Self(value))
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Params {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_are_absent() {
        let params = Params::from([("surahId", "  "), ("id", "2")]);
        assert_eq!(params.first(&["surahId", "id"]), Some("2"));
        assert_eq!(params.get("surahId"), None);
    }

    #[test]
    fn test_raw_keeps_whitespace() {
        let params = Params::from([("query", " ab ")]);
        assert_eq!(params.raw("query"), Some(" ab "));
        assert_eq!(params.get("query"), Some("ab"));
        assert_eq!(params.raw("missing"), None);
    }

    #[test]
    fn test_alias_order() {
        let params = Params::from([("surahId", "1"), ("id", "2")]);
        assert_eq!(params.first(&["surahId", "id"]), Some("1"));
    }

    #[test]
    fn test_require_reports_message() {
        let params = Params::default();
        let err = params.require(&["id"], "id is required").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref m) if m == "id is required"));
    }

    #[test]
    fn test_number() {
        let params = Params::from([("lat", "-6.2"), ("lng", "abc"), ("radius", "inf")]);
        assert_eq!(params.number("lat").unwrap(), Some(-6.2));
        assert!(params.number("lng").is_err());
        assert!(params.number("radius").is_err());
        assert_eq!(params.number("missing").unwrap(), None);
    }
}
