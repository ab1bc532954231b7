//! The account repository capability contract.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use corebank_core::{AccountId, CustomerId};

use crate::account::{Account, AccountType};

/// Backend failure while talking to an account store.
///
/// "Doesn't exist" is never an error here: absent records surface as
/// `Ok(None)` / empty collections so callers can distinguish "not found"
/// from "couldn't ask".
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Network-level failure reaching the backend. The underlying cause is
    /// preserved in the message for diagnostics; nothing is retried here.
    #[error("backend transport failure: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}: {message}")]
    Backend { status: u16, message: String },

    /// The backend answered, but the payload could not be interpreted.
    #[error("malformed backend response: {0}")]
    Decode(String),

    /// A single-result lookup matched more than one account. This is a
    /// data-integrity signal and must never be collapsed to "pick first".
    #[error("ambiguous match: account number {account_number} matched {matches} accounts")]
    AmbiguousMatch { account_number: String, matches: usize },
}

/// Capability set any account backend must satisfy, independent of storage
/// technology. All operations are blocking network round trips from the
/// caller's perspective; retry policy belongs to the caller.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persist a new account scoped to a customer.
    ///
    /// Safe to call exactly once per account identity; duplicate calls with
    /// the same id are backend-defined.
    async fn create_account(
        &self,
        customer_id: &CustomerId,
        account: &Account,
    ) -> Result<(), RepositoryError>;

    /// Batch fetch by id. Backend order is not guaranteed to match input
    /// order; match results by id, never by position.
    async fn get_accounts(&self, ids: &[AccountId]) -> Result<Vec<Account>, RepositoryError>;

    /// All accounts belonging to a customer. Empty when none exist.
    async fn search_accounts_by_customer_id(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<Account>, RepositoryError>;

    /// Disambiguating lookup by (account number, routing number, type), used
    /// for external-transfer verification. At most one account matches; more
    /// than one is `RepositoryError::AmbiguousMatch`.
    async fn search_accounts_by_routing_number(
        &self,
        account_number: &str,
        routing_number: &str,
        account_type: AccountType,
    ) -> Result<Option<Account>, RepositoryError>;

    /// Side-effect-free liveness probe.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Release backend resources. For network-only backends with no held
    /// connections this is a no-op and still returns `Ok(())`.
    async fn close(&self) -> Result<(), RepositoryError>;
}

#[async_trait]
impl<R> AccountRepository for Arc<R>
where
    R: AccountRepository + ?Sized,
{
    async fn create_account(
        &self,
        customer_id: &CustomerId,
        account: &Account,
    ) -> Result<(), RepositoryError> {
        (**self).create_account(customer_id, account).await
    }

    async fn get_accounts(&self, ids: &[AccountId]) -> Result<Vec<Account>, RepositoryError> {
        (**self).get_accounts(ids).await
    }

    async fn search_accounts_by_customer_id(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<Account>, RepositoryError> {
        (**self).search_accounts_by_customer_id(customer_id).await
    }

    async fn search_accounts_by_routing_number(
        &self,
        account_number: &str,
        routing_number: &str,
        account_type: AccountType,
    ) -> Result<Option<Account>, RepositoryError> {
        (**self)
            .search_accounts_by_routing_number(account_number, routing_number, account_type)
            .await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        (**self).ping().await
    }

    async fn close(&self) -> Result<(), RepositoryError> {
        (**self).close().await
    }
}
