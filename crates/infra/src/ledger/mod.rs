//! Ledger-backed account storage.
//!
//! The external ledger stores accounts as append-only signed transaction
//! lines (double-entry bookkeeping) plus a metadata record per account.
//! Numeric amounts and timestamps arrive as strings in a fixed profile;
//! [`codec`] is the sole translator into domain types.

pub mod accounts;
pub mod codec;
pub mod transactions;

pub use accounts::LedgerAccountRepository;
pub use transactions::LedgerTransactions;

use serde::Deserialize;

use corebank_accounts::RepositoryError;

/// Shared HTTP connection to the ledger service.
///
/// Holds no sockets of its own beyond the reqwest pool; cloning is cheap and
/// all clones talk to the same endpoint.
#[derive(Debug, Clone)]
pub struct LedgerConnection {
    client: reqwest::Client,
    endpoint: String,
    auth_token: String,
}

impl LedgerConnection {
    /// Connect to a ledger service at `endpoint` (base URL, e.g.
    /// `http://localhost:7000`) authenticating with `auth_token`.
    pub fn new(endpoint: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            auth_token: auth_token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    pub(crate) async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, RepositoryError> {
        tracing::debug!(path, "ledger request");
        self.client
            .post(self.url(path))
            .bearer_auth(&self.auth_token)
            .json(body)
            .send()
            .await
            .map_err(|e| RepositoryError::Transport(e.to_string()))
    }

    pub(crate) async fn get(&self, path: &str) -> Result<reqwest::Response, RepositoryError> {
        self.client
            .get(self.url(path))
            .bearer_auth(&self.auth_token)
            .send()
            .await
            .map_err(|e| RepositoryError::Transport(e.to_string()))
    }
}

/// Reject non-success statuses, preserving the backend's body for diagnostics.
pub(crate) async fn expect_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, RepositoryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(RepositoryError::Backend {
        status: status.as_u16(),
        message,
    })
}

// -------------------------
// Wire shapes (backend-internal)
// -------------------------

/// Envelope of a `_search` response.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResults<T> {
    #[serde(default)]
    pub results: Vec<T>,
}

/// An account metadata record as the ledger returns it. Every field except
/// the id is a string; interpretation happens at materialization time.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawAccount {
    pub id: String,
    #[serde(default)]
    pub data: RawAccountData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RawAccountData {
    pub customer_id: String,
    pub name: String,
    pub account_number: String,
    pub routing_number: String,
    pub status: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub created_at: String,
    pub last_modified: String,
    pub closed_at: String,
}

/// A posted transaction with its lines, as returned by the line-history
/// search. Amounts and timestamps are textual.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawTransaction {
    #[serde(default)]
    pub lines: Vec<RawLine>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLine {
    pub account: String,
    #[serde(default)]
    pub delta: String,
    /// Settlement state: `"pending"`, `"hold"`, or settled (any other value,
    /// including absent — the ledger omits the field once a line settles).
    #[serde(default)]
    pub state: String,
}
