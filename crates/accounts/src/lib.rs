//! Accounts module (ledger-materialized customer accounts).
//!
//! Pure domain logic and capability contracts only: no IO, no HTTP, no wire
//! formats. Concrete backends live in `corebank-infra`.

pub mod account;
pub mod opening;
pub mod repository;
pub mod search;
pub mod transaction;

pub use account::{Account, AccountType, STATUS_OPEN};
pub use opening::{AccountOpening, OpenAccountError, OpenAccountRequest, MIN_INITIAL_DEPOSIT};
pub use repository::{AccountRepository, RepositoryError};
pub use search::{SearchCriteria, SearchError, SearchParams};
pub use transaction::{
    LinePurpose, Transaction, TransactionError, TransactionLine, TransactionOptions, Transactions,
};
