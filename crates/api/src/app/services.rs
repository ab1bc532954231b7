use std::sync::Arc;

use corebank_accounts::{AccountOpening, AccountRepository, Transactions};
use corebank_infra::{InMemoryLedger, LedgerAccountRepository, LedgerConnection, LedgerTransactions};

type SharedRepository = Arc<dyn AccountRepository>;
type SharedTransactions = Arc<dyn Transactions>;

/// Wired capabilities shared across request handlers.
pub struct AppServices {
    repository: SharedRepository,
    opening: AccountOpening<SharedRepository, SharedTransactions>,
}

impl AppServices {
    pub fn new(
        repository: SharedRepository,
        transactions: SharedTransactions,
        default_routing_number: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.clone(),
            opening: AccountOpening::new(repository, transactions, default_routing_number),
        }
    }

    pub fn repository(&self) -> &SharedRepository {
        &self.repository
    }

    pub fn opening(&self) -> &AccountOpening<SharedRepository, SharedTransactions> {
        &self.opening
    }
}

/// Build services from environment configuration.
///
/// `USE_LEDGER_BACKEND=true` selects the ledger-backed repository (requires
/// `LEDGER_ENDPOINT`); anything else wires the in-memory backend for
/// dev/test.
pub fn build_services() -> AppServices {
    let default_routing_number = std::env::var("DEFAULT_ROUTING_NUMBER").unwrap_or_else(|_| {
        tracing::warn!("DEFAULT_ROUTING_NUMBER not set; using dev default");
        "121042882".to_string()
    });

    let use_ledger = std::env::var("USE_LEDGER_BACKEND")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if use_ledger {
        let endpoint = std::env::var("LEDGER_ENDPOINT")
            .expect("LEDGER_ENDPOINT must be set when USE_LEDGER_BACKEND=true");
        let auth_token = std::env::var("LEDGER_AUTH_TOKEN").unwrap_or_else(|_| {
            tracing::warn!("LEDGER_AUTH_TOKEN not set; sending unauthenticated requests");
            String::new()
        });
        let funding_account = std::env::var("LEDGER_FUNDING_ACCOUNT").unwrap_or_else(|_| {
            tracing::warn!("LEDGER_FUNDING_ACCOUNT not set; using dev default");
            "operating-funds".to_string()
        });

        let conn = LedgerConnection::new(endpoint, auth_token);
        let repository: SharedRepository = Arc::new(LedgerAccountRepository::new(conn.clone()));
        let transactions: SharedTransactions =
            Arc::new(LedgerTransactions::new(conn, funding_account));
        return AppServices::new(repository, transactions, default_routing_number);
    }

    // In-memory wiring (dev/test): one backend serves both capabilities.
    let ledger = Arc::new(InMemoryLedger::new());
    let repository: SharedRepository = ledger.clone();
    let transactions: SharedTransactions = ledger;
    AppServices::new(repository, transactions, default_routing_number)
}
