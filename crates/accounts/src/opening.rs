//! Account-opening orchestration.
//!
//! Validates a creation request, allocates identifiers, and pairs account
//! creation with the mandatory initial-deposit transaction. The two backend
//! calls are strictly ordered but not atomic across systems: a funding
//! failure leaves the account persisted with a zero ledger balance, and that
//! partial-failure state is reported to the caller rather than rolled back.

use chrono::Utc;
use rand::rngs::OsRng;
use rand::Rng;
use thiserror::Error;

use corebank_core::{AccountId, CustomerId, DomainError};

use crate::account::{Account, AccountType, STATUS_OPEN};
use crate::repository::{AccountRepository, RepositoryError};
use crate::transaction::{
    LinePurpose, Transaction, TransactionError, TransactionLine, TransactionOptions, Transactions,
};

/// Minimum opening balance in minor currency units (one whole currency unit).
pub const MIN_INITIAL_DEPOSIT: i64 = 100;

/// Caller-supplied request to open an account, as received on the wire.
#[derive(Debug, Clone)]
pub struct OpenAccountRequest {
    pub customer_id: String,
    pub balance: i64,
    pub name: String,
    pub account_type: String,
}

/// A request that passed validation.
#[derive(Debug, Clone)]
pub struct OpenAccount {
    pub customer_id: CustomerId,
    pub balance: i64,
    pub name: String,
    pub account_type: AccountType,
}

impl OpenAccountRequest {
    /// Validate the request. Runs entirely before any backend call.
    pub fn validate(self) -> Result<OpenAccount, DomainError> {
        let customer_id = CustomerId::parse(&self.customer_id)?;
        if self.balance < MIN_INITIAL_DEPOSIT {
            return Err(DomainError::validation(format!(
                "invalid initial amount {} minor units (minimum {MIN_INITIAL_DEPOSIT})",
                self.balance
            )));
        }
        if self.name.is_empty() {
            return Err(DomainError::validation("missing name"));
        }
        let account_type: AccountType = self.account_type.parse()?;

        Ok(OpenAccount {
            customer_id,
            balance: self.balance,
            name: self.name,
            account_type,
        })
    }
}

/// Failure opening an account.
#[derive(Debug, Error)]
pub enum OpenAccountError {
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// Persisting the account failed; nothing was created.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The account was persisted but the funding transaction failed. The
    /// account remains with a zero ledger balance; remediation (funding retry
    /// or cleanup) is the caller's responsibility.
    #[error("account {account_id} created but initial deposit failed: {source}")]
    Funding {
        account_id: AccountId,
        #[source]
        source: TransactionError,
    },
}

/// Synthesize a numeric account number from the OS entropy source.
///
/// Drawn over a fixed range with no uniqueness check against existing
/// accounts; collision handling is backend-defined.
fn generate_account_number() -> String {
    OsRng.gen_range(0..1_000_000_000u32).to_string()
}

/// Orchestrates account creation against the repository and transaction
/// capabilities.
pub struct AccountOpening<R, T> {
    repository: R,
    transactions: T,
    default_routing_number: String,
}

impl<R, T> AccountOpening<R, T>
where
    R: AccountRepository,
    T: Transactions,
{
    pub fn new(repository: R, transactions: T, default_routing_number: impl Into<String>) -> Self {
        Self {
            repository,
            transactions,
            default_routing_number: default_routing_number.into(),
        }
    }

    /// Open a new account funded with the requested opening balance.
    ///
    /// Account persistence is strictly ordered before the deposit submission.
    /// A concurrent reader may observe the account before the deposit is
    /// visible.
    pub async fn open(&self, request: OpenAccountRequest) -> Result<Account, OpenAccountError> {
        let request = request.validate()?;

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            customer_id: request.customer_id.clone(),
            name: request.name,
            account_number: generate_account_number(),
            routing_number: self.default_routing_number.clone(),
            status: STATUS_OPEN.to_string(),
            account_type: request.account_type,
            balance: 0,
            balance_pending: 0,
            balance_available: 0,
            created_at: now,
            last_modified: now,
            closed_at: None,
        };

        self.repository
            .create_account(&request.customer_id, &account)
            .await?;

        let deposit = Transaction::new(
            vec![TransactionLine {
                account_id: account.id,
                purpose: LinePurpose::AchCredit,
                amount: request.balance,
            }],
            now,
        );
        self.transactions
            .create_transaction(deposit, TransactionOptions { initial_deposit: true })
            .await
            .map_err(|source| OpenAccountError::Funding {
                account_id: account.id,
                source,
            })?;

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingRepository {
        created: Mutex<Vec<Account>>,
    }

    #[async_trait]
    impl AccountRepository for RecordingRepository {
        async fn create_account(
            &self,
            _customer_id: &CustomerId,
            account: &Account,
        ) -> Result<(), RepositoryError> {
            self.created.lock().unwrap().push(account.clone());
            Ok(())
        }

        async fn get_accounts(&self, _ids: &[AccountId]) -> Result<Vec<Account>, RepositoryError> {
            Ok(vec![])
        }

        async fn search_accounts_by_customer_id(
            &self,
            _customer_id: &CustomerId,
        ) -> Result<Vec<Account>, RepositoryError> {
            Ok(vec![])
        }

        async fn search_accounts_by_routing_number(
            &self,
            _account_number: &str,
            _routing_number: &str,
            _account_type: AccountType,
        ) -> Result<Option<Account>, RepositoryError> {
            Ok(None)
        }

        async fn ping(&self) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn close(&self) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingTransactions {
        posted: Mutex<Vec<(Transaction, TransactionOptions)>>,
        fail: bool,
    }

    #[async_trait]
    impl Transactions for RecordingTransactions {
        async fn create_transaction(
            &self,
            transaction: Transaction,
            options: TransactionOptions,
        ) -> Result<(), TransactionError> {
            self.posted.lock().unwrap().push((transaction, options));
            if self.fail {
                return Err(TransactionError::Rejected {
                    status: 400,
                    message: "lines do not balance".to_string(),
                });
            }
            Ok(())
        }
    }

    fn request() -> OpenAccountRequest {
        OpenAccountRequest {
            customer_id: "cust-1".to_string(),
            balance: 100,
            name: "example account".to_string(),
            account_type: "Checking".to_string(),
        }
    }

    #[tokio::test]
    async fn sub_minimum_balance_is_rejected_before_any_backend_call() {
        let repo = Arc::new(RecordingRepository::default());
        let txs = Arc::new(RecordingTransactions::default());
        let opening = AccountOpening::new(repo.clone(), txs.clone(), "121042882");

        let err = opening
            .open(OpenAccountRequest {
                balance: 99,
                ..request()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, OpenAccountError::Validation(_)));
        assert!(repo.created.lock().unwrap().is_empty());
        assert!(txs.posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn type_is_case_normalized() {
        let repo = Arc::new(RecordingRepository::default());
        let txs = Arc::new(RecordingTransactions::default());
        let opening = AccountOpening::new(repo.clone(), txs.clone(), "121042882");

        let account = opening.open(request()).await.unwrap();
        assert_eq!(account.account_type, AccountType::Checking);
        assert_eq!(account.status, STATUS_OPEN);
    }

    #[tokio::test]
    async fn empty_customer_id_and_name_are_rejected() {
        let repo = Arc::new(RecordingRepository::default());
        let txs = Arc::new(RecordingTransactions::default());
        let opening = AccountOpening::new(repo.clone(), txs.clone(), "121042882");

        let err = opening
            .open(OpenAccountRequest {
                customer_id: "   ".to_string(),
                ..request()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, OpenAccountError::Validation(_)));

        let err = opening
            .open(OpenAccountRequest {
                name: String::new(),
                ..request()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, OpenAccountError::Validation(_)));
        assert!(repo.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn successful_open_posts_a_single_initial_deposit_line() {
        let repo = Arc::new(RecordingRepository::default());
        let txs = Arc::new(RecordingTransactions::default());
        let opening = AccountOpening::new(repo.clone(), txs.clone(), "121042882");

        let account = opening.open(request()).await.unwrap();

        assert_eq!(account.routing_number, "121042882");
        assert!(!account.account_number.is_empty());
        assert!(account.account_number.chars().all(|c| c.is_ascii_digit()));

        let posted = txs.posted.lock().unwrap();
        assert_eq!(posted.len(), 1);
        let (transaction, options) = &posted[0];
        assert!(options.initial_deposit);
        assert_eq!(transaction.lines.len(), 1);
        assert_eq!(transaction.lines[0].account_id, account.id);
        assert_eq!(transaction.lines[0].purpose, LinePurpose::AchCredit);
        assert_eq!(transaction.lines[0].amount, 100);
    }

    #[tokio::test]
    async fn funding_failure_reports_partial_state_with_account_id() {
        let repo = Arc::new(RecordingRepository::default());
        let txs = Arc::new(RecordingTransactions {
            fail: true,
            ..Default::default()
        });
        let opening = AccountOpening::new(repo.clone(), txs.clone(), "121042882");

        let err = opening.open(request()).await.unwrap_err();

        // The account was persisted; the error carries its id for remediation.
        let created = repo.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        match err {
            OpenAccountError::Funding { account_id, .. } => {
                assert_eq!(account_id, created[0].id);
            }
            other => panic!("expected funding error, got {other:?}"),
        }
    }
}
