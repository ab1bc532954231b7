use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use corebank_accounts::search::{self, SearchError};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::RequestContext;

pub fn router() -> Router {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts/search", get(search_accounts))
}

/// Open a new account funded with the requested opening balance.
///
/// Returns the created account; balances materialize on subsequent reads
/// once the ledger has the funding lines.
pub async fn create_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<dto::CreateAccountRequest>,
) -> axum::response::Response {
    match services.opening().open(body.into_request()).await {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => errors::open_account_error_to_response(&ctx, e),
    }
}

/// Find accounts matching the query parameters. Searching with an account
/// number returns exactly one account; otherwise results are scoped to a
/// customer. Missing parameters are a 400, zero results a 404.
pub async fn search_accounts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<dto::SearchQuery>,
) -> axum::response::Response {
    let criteria = match query.into_params().resolve() {
        Ok(criteria) => criteria,
        Err(e) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "missing_parameters", e.to_string())
        }
    };

    match search::run(services.repository(), criteria).await {
        Ok(accounts) => (StatusCode::OK, Json(accounts)).into_response(),
        Err(SearchError::NotFound) => {
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "account not found")
        }
        // Backend failures surface the same as not-found to the caller; the
        // cause only goes to the log, keyed by request id.
        Err(SearchError::Repository(e)) => {
            tracing::warn!(request_id = ctx.request_id(), error = %e, "account search failed");
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "account not found")
        }
    }
}
