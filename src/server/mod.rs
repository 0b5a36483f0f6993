//! HTTP surface.
//!
//! [`router`] builds the axum application; [`serve`] binds and runs it.
//! Every response carries a request id and the standard security headers.

pub mod auth;
pub mod params;
pub mod response;
mod routes;

use crate::config::{ApiConfig, Environment};
use crate::observability::{REQUEST_ID_HEADER, RequestContext, scope_request_context};
use crate::services::ServiceContainer;
use crate::{Error, Result};
use axum::Router;
use axum::extract::{MatchedPath, Request};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// All services.
    pub services: Arc<ServiceContainer>,
    /// Deployment environment, consulted by the admin gate.
    pub environment: Environment,
    /// Admin shared secret.
    pub admin_api_key: Option<Arc<SecretString>>,
    /// Prometheus handle, when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Builds state from configuration and services.
    #[must_use]
    pub fn new(
        config: &ApiConfig,
        services: ServiceContainer,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            services: Arc::new(services),
            environment: config.environment,
            admin_api_key: config.admin_api_key.clone().map(Arc::new),
            metrics,
        }
    }
}

/// Assigns a request id, scopes it over the handler and echoes it back.
async fn request_context(mut request: Request, next: Next) -> Response {
    let inbound = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok());
    let context = RequestContext::from_inbound(inbound);
    let request_id = HeaderValue::from_str(context.request_id()).ok();
    if let Some(value) = &request_id {
        request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }

    let mut response = scope_request_context(context, next.run(request)).await;
    if let Some(value) = request_id {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Records request count and latency per matched route.
async fn record_http_metrics(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);
    metrics::histogram!(
        "http_request_duration_ms",
        "method" => method,
        "route" => route
    )
    .record(start.elapsed().as_secs_f64() * 1000.0);

    response
}

fn http_span(request: &Request) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let admin = routes::admin::router().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::admin_gate,
    ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::PATCH, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .merge(routes::quran::router())
        .merge(routes::devotion::router())
        .merge(routes::hadith::router())
        .merge(routes::kemenag::router())
        .merge(routes::murotal::router())
        .merge(routes::sejarah::router())
        .merge(routes::integrity::router())
        .merge(routes::tools::router())
        .merge(routes::system::router())
        .nest("/admin", admin)
        .route_layer(middleware::from_fn(record_http_metrics))
        .fallback(routes::system::not_found)
        .with_state(state)
        // Security headers (OWASP recommendations)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::HeaderName::from_static("x-permitted-cross-domain-policies"),
            HeaderValue::from_static("none"),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(http_span))
        .layer(middleware::from_fn(request_context))
}

/// Binds the configured address and serves until ctrl-c.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(config: &ApiConfig, state: AppState) -> Result<()> {
    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::operation("bind", e))?;

    tracing::info!(
        %addr,
        environment = config.environment.as_str(),
        store_available = state.services.store().is_available(),
        "Starting HTTP server"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %err, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutting down");
        })
        .await
        .map_err(|e| Error::operation("serve", e))
}
