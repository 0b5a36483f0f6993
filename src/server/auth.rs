//! Shared-secret gate for the admin routes.

use super::AppState;
use super::response::ApiError;
use crate::Error;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use secrecy::ExposeSecret;

/// Header carrying the admin key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Constant-time comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Decides whether an admin call may proceed.
///
/// Production rejects before looking at credentials. Without a configured
/// key every call is unauthorized.
///
/// # Errors
///
/// Returns [`Error::Forbidden`] in production and [`Error::Unauthorized`]
/// for a missing or wrong key.
pub fn check_admin(state: &AppState, presented: Option<&str>) -> Result<(), Error> {
    if state.environment.is_production() {
        metrics::counter!("admin_auth_failures_total", "reason" => "production").increment(1);
        return Err(Error::Forbidden(
            "admin updates are disabled in production".to_string(),
        ));
    }

    let Some(expected) = state.admin_api_key.as_deref() else {
        tracing::warn!("Admin auth failed: no key configured");
        metrics::counter!("admin_auth_failures_total", "reason" => "unconfigured").increment(1);
        return Err(Error::Unauthorized("invalid or missing API key".to_string()));
    };

    let presented = presented.unwrap_or_default();
    if constant_time_eq(expected.expose_secret().as_bytes(), presented.as_bytes()) {
        Ok(())
    } else {
        tracing::warn!("Admin auth failed: invalid key");
        metrics::counter!("admin_auth_failures_total", "reason" => "invalid_key").increment(1);
        Err(Error::Unauthorized("invalid or missing API key".to_string()))
    }
}

/// Middleware applying [`check_admin`] to every nested admin route.
///
/// # Errors
///
/// Returns the 403 or 401 envelope when the gate rejects the call.
pub async fn admin_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok());
    check_admin(&state, presented)?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hell"));
    }
}
