use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use corebank_accounts::OpenAccountError;

use crate::context::RequestContext;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn open_account_error_to_response(
    ctx: &RequestContext,
    err: OpenAccountError,
) -> axum::response::Response {
    match err {
        OpenAccountError::Validation(e) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string())
        }
        OpenAccountError::Repository(e) => {
            tracing::warn!(request_id = ctx.request_id(), error = %e, "account creation failed");
            json_error(StatusCode::BAD_GATEWAY, "backend_error", e.to_string())
        }
        // The account exists without its funding; surface enough detail for
        // the caller to recognize the partial state and remediate.
        OpenAccountError::Funding { account_id, source } => {
            tracing::error!(
                request_id = ctx.request_id(),
                account_id = %account_id,
                error = %source,
                "initial deposit failed after account creation"
            );
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "funding_failed",
                format!("account {account_id} created but initial deposit failed: {source}"),
            )
        }
    }
}
