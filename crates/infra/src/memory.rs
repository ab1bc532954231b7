//! In-memory ledger backend for dev/test.
//!
//! Implements both capability contracts against an `RwLock`ed map, storing
//! raw lines and materializing balances at read time with the same projection
//! semantics as the ledger-backed adapter: the stored account record is
//! metadata only, balances are always derived from lines.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use corebank_accounts::{
    Account, AccountRepository, AccountType, LinePurpose, RepositoryError, Transaction,
    TransactionError, TransactionOptions, Transactions,
};
use corebank_core::{AccountId, CustomerId};

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<AccountId, Account>,
    /// Settled signed deltas; this backend settles every line immediately.
    lines: Vec<(AccountId, i64)>,
}

impl State {
    fn materialize(&self, account: &Account) -> Account {
        let balance: i64 = self
            .lines
            .iter()
            .filter(|(id, _)| *id == account.id)
            .map(|(_, delta)| delta)
            .sum();
        Account {
            balance,
            balance_pending: 0,
            balance_available: balance,
            ..account.clone()
        }
    }
}

/// In-memory stand-in for the external ledger service.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    inner: RwLock<State>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryLedger {
    async fn create_account(
        &self,
        _customer_id: &CustomerId,
        account: &Account,
    ) -> Result<(), RepositoryError> {
        let mut state = self
            .inner
            .write()
            .map_err(|e| RepositoryError::Backend {
                status: 500,
                message: e.to_string(),
            })?;
        if state.accounts.contains_key(&account.id) {
            return Err(RepositoryError::Backend {
                status: 409,
                message: format!("account {} already exists", account.id),
            });
        }
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn get_accounts(&self, ids: &[AccountId]) -> Result<Vec<Account>, RepositoryError> {
        let state = self.inner.read().map_err(|e| RepositoryError::Backend {
            status: 500,
            message: e.to_string(),
        })?;
        Ok(ids
            .iter()
            .filter_map(|id| state.accounts.get(id))
            .map(|a| state.materialize(a))
            .collect())
    }

    async fn search_accounts_by_customer_id(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<Account>, RepositoryError> {
        let state = self.inner.read().map_err(|e| RepositoryError::Backend {
            status: 500,
            message: e.to_string(),
        })?;
        Ok(state
            .accounts
            .values()
            .filter(|a| &a.customer_id == customer_id)
            .map(|a| state.materialize(a))
            .collect())
    }

    async fn search_accounts_by_routing_number(
        &self,
        account_number: &str,
        routing_number: &str,
        account_type: AccountType,
    ) -> Result<Option<Account>, RepositoryError> {
        let state = self.inner.read().map_err(|e| RepositoryError::Backend {
            status: 500,
            message: e.to_string(),
        })?;
        let matches: Vec<&Account> = state
            .accounts
            .values()
            .filter(|a| {
                a.account_number == account_number
                    && a.routing_number == routing_number
                    && a.account_type == account_type
            })
            .collect();
        match matches.as_slice() {
            [] => Ok(None),
            [account] => Ok(Some(state.materialize(account))),
            many => Err(RepositoryError::AmbiguousMatch {
                account_number: account_number.to_string(),
                matches: many.len(),
            }),
        }
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    /// No-op: nothing is held beyond process memory.
    async fn close(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl Transactions for InMemoryLedger {
    async fn create_transaction(
        &self,
        transaction: Transaction,
        _options: TransactionOptions,
    ) -> Result<(), TransactionError> {
        let mut state = self.inner.write().map_err(|e| TransactionError::Rejected {
            status: 500,
            message: e.to_string(),
        })?;
        for line in &transaction.lines {
            if !state.accounts.contains_key(&line.account_id) {
                return Err(TransactionError::Rejected {
                    status: 400,
                    message: format!("unknown account {}", line.account_id),
                });
            }
        }
        for line in &transaction.lines {
            let delta = match line.purpose {
                LinePurpose::AchCredit => line.amount,
                LinePurpose::AchDebit => -line.amount,
            };
            state.lines.push((line.account_id, delta));
        }
        Ok(())
    }
}
