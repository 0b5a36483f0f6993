//! JSON envelope shared by every endpoint.
//!
//! Successful bodies are `{"status": true, "message", "data"}`; failures are
//! `{"status": false, "message"}` with `data: {}` added for not-found and
//! the upstream message under `error` for proxy failures.

use crate::Error;
use crate::observability::current_request_id;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Handler result.
pub type ApiResult = std::result::Result<Response, ApiError>;

/// An [`Error`] rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

/// Maps an error to its HTTP status.
#[must_use]
pub fn status_code(err: &Error) -> StatusCode {
    match err {
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        Error::Forbidden(_) => StatusCode::FORBIDDEN,
        Error::Upstream { status, .. } => status
            .and_then(|s| StatusCode::from_u16(s).ok())
            .filter(|s| !s.is_success())
            .unwrap_or(StatusCode::BAD_GATEWAY),
        Error::StoreUnavailable(_) | Error::OperationFailed { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        },
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_code(&self.0);
        let mut body = Map::new();
        body.insert("status".to_string(), Value::Bool(false));

        match self.0 {
            Error::InvalidInput(message)
            | Error::Unauthorized(message)
            | Error::Forbidden(message) => {
                body.insert("message".to_string(), Value::String(message));
            },
            Error::NotFound(message) => {
                body.insert("message".to_string(), Value::String(message));
                body.insert("data".to_string(), Value::Object(Map::new()));
            },
            Error::Upstream { message, .. } => {
                body.insert(
                    "message".to_string(),
                    Value::String("upstream source returned an error".to_string()),
                );
                body.insert("error".to_string(), Value::String(message));
            },
            err @ (Error::StoreUnavailable(_) | Error::OperationFailed { .. }) => {
                let request_id = current_request_id();
                tracing::error!(
                    error = %err,
                    request_id = request_id.as_deref().unwrap_or("-"),
                    "Request failed"
                );
                body.insert("message".to_string(), Value::String(err.to_string()));
            },
        }

        (status, Json(Value::Object(body))).into_response()
    }
}

fn to_value(payload: impl Serialize) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(|e| ApiError(Error::operation("serialize_response", e)))
}

/// `200 {"status": true, "message", "data"}`.
///
/// # Errors
///
/// Returns a 500 if `data` fails to serialize.
pub fn success(message: impl Into<String>, data: impl Serialize) -> ApiResult {
    let body = json!({
        "status": true,
        "message": message.into(),
        "data": to_value(data)?,
    });
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// `200 {"status": true, "message", ...payload}` with the payload's fields
/// at the top level.
///
/// # Errors
///
/// Returns a 500 if `payload` does not serialize to a JSON object.
pub fn success_flat(message: impl Into<String>, payload: impl Serialize) -> ApiResult {
    let Value::Object(fields) = to_value(payload)? else {
        return Err(ApiError(Error::operation(
            "serialize_response",
            "payload is not a JSON object",
        )));
    };

    let mut body = Map::with_capacity(fields.len() + 2);
    body.insert("status".to_string(), Value::Bool(true));
    body.insert("message".to_string(), Value::String(message.into()));
    for (key, value) in fields {
        if key != "status" && key != "message" {
            body.insert(key, value);
        }
    }
    Ok((StatusCode::OK, Json(Value::Object(body))).into_response())
}
