//! HTTP client for third-party APIs.

use crate::config::UpstreamConfig;
use crate::{Error, Result};
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str = concat!("muslim-api/", env!("CARGO_PKG_VERSION"));

/// A decoded upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// HTTP status code.
    pub status: u16,
    /// JSON body, or `Value::Null` when the body was not JSON.
    pub body: Value,
}

impl UpstreamResponse {
    /// Returns true for a 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns the `message` field of the body, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

/// Shared async client with configured timeouts.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    config: UpstreamConfig,
}

/// Builds an HTTP client for upstream requests with configured timeouts.
#[must_use]
pub fn build_http_client(config: &UpstreamConfig) -> reqwest::Client {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if config.timeout_ms > 0 {
        builder = builder.timeout(config.timeout());
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(config.connect_timeout());
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build upstream HTTP client: {err}");
        reqwest::Client::new()
    })
}

impl UpstreamClient {
    /// Creates a client for the configured upstreams.
    #[must_use]
    pub fn new(config: UpstreamConfig) -> Self {
        Self {
            client: build_http_client(&config),
            config,
        }
    }

    /// Returns the upstream configuration.
    #[must_use]
    pub const fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Builds `base/seg1/seg2...`, percent-encoding each segment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if `base` is not a valid base URL.
    pub fn url(base: &str, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(base).map_err(|e| Error::operation("upstream_url", e))?;
        url.path_segments_mut()
            .map_err(|()| Error::operation("upstream_url", format!("not a base URL: {base}")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issues a GET and decodes the JSON body.
    ///
    /// Transport failures and timeouts are errors. A non-JSON body on a
    /// failing status decodes to `Value::Null`; on a success status it is a
    /// gateway error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] on transport failure or timeout, and
    /// [`Error::Upstream`] without a status for an undecodable success body.
    pub async fn get_json(
        &self,
        operation: &'static str,
        url: Url,
        timeout: Option<Duration>,
    ) -> Result<UpstreamResponse> {
        tracing::debug!(operation, url = %url, "Upstream request");
        let mut request = self.client.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::operation(operation, e))?;
        let status = response.status();
        metrics::counter!(
            "upstream_requests_total",
            "operation" => operation,
            "status" => status.as_str().to_string()
        )
        .increment(1);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::operation(operation, e))?;

        let body = match serde_json::from_slice::<Value>(&bytes) {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                tracing::warn!(operation, error = %e, "Upstream sent a non-JSON body");
                return Err(Error::Upstream {
                    status: None,
                    message: format!("malformed response body: {e}"),
                });
            },
            Err(_) => Value::Null,
        };

        Ok(UpstreamResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encodes_segments() {
        let url = UpstreamClient::url("https://api.example.test/", &["books", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.test/books/a%20b%2Fc");

        let url = UpstreamClient::url("https://api.example.test/api", &["x.json"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.test/api/x.json");
    }

    #[test]
    fn test_url_rejects_garbage_base() {
        assert!(UpstreamClient::url("not a url", &["x"]).is_err());
        assert!(UpstreamClient::url("mailto:someone@example.test", &["x"]).is_err());
    }

    #[test]
    fn test_response_helpers() {
        let response = UpstreamResponse {
            status: 404,
            body: serde_json::json!({"code": 404, "message": "Books not found"}),
        };
        assert!(!response.is_success());
        assert_eq!(response.message(), Some("Books not found"));
    }
}
