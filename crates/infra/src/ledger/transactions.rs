//! Transaction posting against the external ledger service.

use async_trait::async_trait;
use chrono::SecondsFormat;

use corebank_accounts::{
    LinePurpose, RepositoryError, Transaction, TransactionError, TransactionOptions, Transactions,
};

use super::{expect_success, LedgerConnection};

/// Ledger-backed [`Transactions`] capability.
///
/// The ledger enforces the double-entry balance rule: every posted entry must
/// net to zero. An initial deposit arrives from the core as a single credit
/// line, so the offsetting side is drawn against the configured funding
/// account before posting.
#[derive(Debug, Clone)]
pub struct LedgerTransactions {
    conn: LedgerConnection,
    funding_account: String,
}

impl LedgerTransactions {
    pub fn new(conn: LedgerConnection, funding_account: impl Into<String>) -> Self {
        Self {
            conn,
            funding_account: funding_account.into(),
        }
    }
}

fn signed_delta(purpose: LinePurpose, amount: i64) -> i64 {
    match purpose {
        LinePurpose::AchCredit => amount,
        LinePurpose::AchDebit => -amount,
    }
}

#[async_trait]
impl Transactions for LedgerTransactions {
    async fn create_transaction(
        &self,
        transaction: Transaction,
        options: TransactionOptions,
    ) -> Result<(), TransactionError> {
        let mut net = 0i64;
        let mut lines: Vec<serde_json::Value> = transaction
            .lines
            .iter()
            .map(|line| {
                let delta = signed_delta(line.purpose, line.amount);
                net += delta;
                serde_json::json!({
                    "account": line.account_id.to_string(),
                    "delta": delta.to_string(),
                })
            })
            .collect();
        if options.initial_deposit {
            lines.push(serde_json::json!({
                "account": self.funding_account,
                "delta": (-net).to_string(),
            }));
        }

        let body = serde_json::json!({
            "id": transaction.id.to_string(),
            "timestamp": transaction.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            "lines": lines,
            "data": { "initialDeposit": options.initial_deposit },
        });

        let response = self
            .conn
            .post_json("/v1/transactions", &body)
            .await
            .map_err(|e| match e {
                RepositoryError::Transport(msg) => TransactionError::Transport(msg),
                other => TransactionError::Transport(other.to_string()),
            })?;
        expect_success(response).await.map_err(|e| match e {
            RepositoryError::Backend { status, message } => {
                TransactionError::Rejected { status, message }
            }
            other => TransactionError::Transport(other.to_string()),
        })?;
        Ok(())
    }
}
