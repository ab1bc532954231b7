//! Account search dispatch.
//!
//! Resolves which search strategy to run from the query parameters that are
//! present. Exactly one strategy runs per request; they are never merged.

use thiserror::Error;

use corebank_core::{CustomerId, DomainError};

use crate::account::{Account, AccountType};
use crate::repository::{AccountRepository, RepositoryError};

/// Raw query parameters as received at the boundary.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub number: Option<String>,
    pub routing_number: Option<String>,
    pub account_type: Option<String>,
    pub customer_id: Option<String>,
}

/// The resolved search strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriteria {
    /// Single-result lookup by (account number, routing number, type).
    ByNumber {
        account_number: String,
        routing_number: String,
        account_type: AccountType,
    },
    /// Multi-result lookup scoped to a customer.
    ByCustomer(CustomerId),
}

impl SearchParams {
    /// Resolve the strategy, in order: the full number/routing/type triple
    /// wins, then customer id; anything less is a validation error.
    pub fn resolve(self) -> Result<SearchCriteria, DomainError> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

        if let (Some(number), Some(routing_number), Some(account_type)) = (
            non_empty(self.number.clone()),
            non_empty(self.routing_number.clone()),
            non_empty(self.account_type.clone()),
        ) {
            return Ok(SearchCriteria::ByNumber {
                account_number: number,
                routing_number,
                account_type: account_type.parse()?,
            });
        }

        if let Some(customer_id) = non_empty(self.customer_id) {
            return Ok(SearchCriteria::ByCustomer(CustomerId::parse(customer_id)?));
        }

        Err(DomainError::validation(
            "missing account search query parameters",
        ))
    }
}

/// Failure running a resolved search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Zero results for the customer lookup, or an absent single-record
    /// lookup. Reported distinctly from transport failures.
    #[error("account not found")]
    NotFound,

    /// The backend could not be asked. Carried through so the boundary can
    /// log the cause, even where it surfaces the same as not-found.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Run exactly one search strategy against the repository.
pub async fn run<R>(repository: &R, criteria: SearchCriteria) -> Result<Vec<Account>, SearchError>
where
    R: AccountRepository,
{
    match criteria {
        SearchCriteria::ByNumber {
            account_number,
            routing_number,
            account_type,
        } => {
            let account = repository
                .search_accounts_by_routing_number(&account_number, &routing_number, account_type)
                .await?;
            match account {
                Some(account) => Ok(vec![account]),
                None => Err(SearchError::NotFound),
            }
        }
        SearchCriteria::ByCustomer(customer_id) => {
            let accounts = repository
                .search_accounts_by_customer_id(&customer_id)
                .await?;
            if accounts.is_empty() {
                return Err(SearchError::NotFound);
            }
            Ok(accounts)
        }
    }
}
