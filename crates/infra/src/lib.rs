//! `corebank-infra` — concrete account backends.
//!
//! Two implementations of the capability contracts from `corebank-accounts`:
//! the ledger-backed adapter (HTTP client against the external double-entry
//! ledger service) and an in-memory stand-in for dev/test. Which one a
//! process uses is decided at startup by configuration.

pub mod ledger;
pub mod memory;

pub use ledger::{LedgerAccountRepository, LedgerConnection, LedgerTransactions};
pub use memory::InMemoryLedger;
