//! Per-request context injected by middleware.

/// Correlating request identifier threaded through handlers for tracing.
///
/// Carries no behavioral effect on the core's invariants; it only shows up in
/// logs and the response headers.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}
