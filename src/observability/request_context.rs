//! Request context propagation for correlation IDs.

use std::future::Future;
use uuid::Uuid;

/// Header carrying the request id in and out of the server.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inbound request id that is accepted verbatim.
const MAX_INBOUND_ID_LEN: usize = 128;

/// Per-request context with correlation ID.
#[derive(Clone, Debug)]
pub struct RequestContext {
    request_id: String,
}

impl RequestContext {
    /// Creates a new request context with a generated ID.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
        }
    }

    /// Reuses a caller-supplied id when it is short and printable,
    /// otherwise generates a fresh one.
    #[must_use]
    pub fn from_inbound(inbound: Option<&str>) -> Self {
        match inbound {
            Some(id)
                if !id.is_empty()
                    && id.len() <= MAX_INBOUND_ID_LEN
                    && id.chars().all(|c| c.is_ascii_graphic()) =>
            {
                Self {
                    request_id: id.to_string(),
                }
            },
            _ => Self::new(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

tokio::task_local! {
    static TASK_CONTEXT: RequestContext;
}

/// Scopes a request context across an async future.
pub async fn scope_request_context<F, T>(context: RequestContext, fut: F) -> T
where
    F: Future<Output = T>,
{
    TASK_CONTEXT.scope(context, fut).await
}

/// Returns the current request ID, if set.
#[must_use]
pub fn current_request_id() -> Option<String> {
    TASK_CONTEXT.try_with(|ctx| ctx.request_id.clone()).ok()
}
