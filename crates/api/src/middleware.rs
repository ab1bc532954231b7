use axum::{
    http::HeaderValue,
    middleware::Next,
    response::Response,
};

use corebank_core::RequestId;

use crate::context::RequestContext;

/// Header carrying the caller-supplied correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Honor a caller-supplied `X-Request-Id` or mint a fresh one, stash it in
/// request extensions for handlers to log with, and echo it on the response.
pub async fn request_id_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .unwrap_or_else(|| RequestId::new().to_string());

    req.extensions_mut()
        .insert(RequestContext::new(request_id.clone()));

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
