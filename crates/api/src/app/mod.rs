//! HTTP API application wiring (Axum router + service wiring).
//!
//! This folder is structured like:
//! - `services.rs`: infrastructure wiring (backend selection, orchestrator)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs and query-parameter mapping
//! - `errors.rs`: consistent problem-style error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Backend selection happens here via environment configuration; tests that
/// want a specific backend use [`router_with`].
pub fn build_app() -> Router {
    router_with(Arc::new(services::build_services()))
}

/// Build the router around already-wired services.
pub fn router_with(services: Arc<services::AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(ServiceBuilder::new())
}
