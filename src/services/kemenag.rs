//! Proxies for the national holiday calendar and the pesantren directory.

use super::upstream::{UpstreamClient, UpstreamResponse};
use crate::models::{Holiday, HolidayCalendar};
use crate::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

/// One item as served by the holiday API.
#[derive(Debug, Deserialize)]
struct UpstreamHoliday {
    holiday_date: String,
    holiday_name: String,
    #[serde(default)]
    is_national_holiday: bool,
}

impl From<UpstreamHoliday> for Holiday {
    fn from(item: UpstreamHoliday) -> Self {
        Self {
            tanggal: item.holiday_date,
            keterangan: item.holiday_name,
            is_cuti: !item.is_national_holiday,
        }
    }
}

fn relay_failure(response: &UpstreamResponse, fallback: String) -> Error {
    Error::Upstream {
        status: Some(response.status),
        message: response.message().map_or(fallback, ToString::to_string),
    }
}

/// Holiday and pesantren lookups.
#[derive(Debug, Clone)]
pub struct KemenagService {
    upstream: UpstreamClient,
}

impl KemenagService {
    /// Creates a new service.
    #[must_use]
    pub const fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }

    /// Returns the holidays of a year, reshaped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the upstream has no data for the year
    /// and [`Error::OperationFailed`] on transport or decoding errors.
    #[instrument(skip(self))]
    pub async fn holidays(&self, year: &str) -> Result<HolidayCalendar> {
        let mut url = UpstreamClient::url(&self.upstream.config().holiday_base_url, &[])?;
        url.query_pairs_mut().append_pair("year", year);

        let response = self.upstream.get_json("holidays", url, None).await?;
        if !response.is_success() {
            return Err(Error::NotFound(format!("no holiday data for {year}")));
        }

        let items: Vec<UpstreamHoliday> = serde_json::from_value(response.body)
            .map_err(|e| Error::operation("holidays", e))?;

        Ok(HolidayCalendar {
            year: year.to_string(),
            holidays: items.into_iter().map(Holiday::from).collect(),
        })
    }

    /// Lists provinces.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] with the upstream status on failure.
    #[instrument(skip(self))]
    pub async fn provinces(&self) -> Result<Value> {
        self.fetch_dataset("pesantren_provinces", &["provinsi.json"], "failed to fetch provinces".to_string())
            .await
    }

    /// Lists the regencies of a province.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] with the upstream status on failure.
    #[instrument(skip(self))]
    pub async fn regencies(&self, provinsi_id: &str) -> Result<Value> {
        let file = format!("{provinsi_id}.json");
        self.fetch_dataset(
            "pesantren_regencies",
            &["kabupaten", &file],
            format!("failed to fetch regencies of province {provinsi_id}"),
        )
        .await
    }

    /// Lists the pesantren of a regency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] with the upstream status on failure.
    #[instrument(skip(self))]
    pub async fn pesantren(&self, kabupaten_id: &str) -> Result<Value> {
        let file = format!("{kabupaten_id}.json");
        self.fetch_dataset(
            "pesantren_list",
            &["pesantren", &file],
            format!("no pesantren data for regency {kabupaten_id}"),
        )
        .await
    }

    async fn fetch_dataset(
        &self,
        operation: &'static str,
        segments: &[&str],
        failure: String,
    ) -> Result<Value> {
        let url = UpstreamClient::url(&self.upstream.config().pesantren_base_url, segments)?;
        let response = self.upstream.get_json(operation, url, None).await?;
        if !response.is_success() {
            return Err(relay_failure(&response, failure));
        }
        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_holiday_reshape() {
        let items: Vec<UpstreamHoliday> = serde_json::from_value(json!([
            {"holiday_date": "2025-03-31", "holiday_name": "Idul Fitri", "is_national_holiday": true},
            {"holiday_date": "2025-04-02", "holiday_name": "Cuti Bersama Idul Fitri", "is_national_holiday": false},
            {"holiday_date": "2025-04-03", "holiday_name": "Cuti Bersama"}
        ]))
        .unwrap();
        let holidays: Vec<Holiday> = items.into_iter().map(Holiday::from).collect();

        assert_eq!(holidays[0].tanggal, "2025-03-31");
        assert!(!holidays[0].is_cuti);
        assert!(holidays[1].is_cuti);
        assert!(holidays[2].is_cuti);
    }

    #[test]
    fn test_relay_failure_prefers_upstream_message() {
        let response = UpstreamResponse {
            status: 404,
            body: json!({"message": "Not Found"}),
        };
        let err = relay_failure(&response, "fallback".to_string());
        assert!(matches!(err, Error::Upstream { status: Some(404), ref message } if message == "Not Found"));

        let response = UpstreamResponse {
            status: 500,
            body: Value::Null,
        };
        let err = relay_failure(&response, "fallback".to_string());
        assert!(matches!(err, Error::Upstream { status: Some(500), ref message } if message == "fallback"));
    }
}
