use axum::Router;

pub mod accounts;
pub mod system;

/// Routes exposed by the service (mounted at the root).
pub fn router() -> Router {
    accounts::router()
}
