//! Transaction types and the transaction-posting capability.
//!
//! This module only defines the call contract the account core depends on.
//! Line validation, sign conventions and settlement are enforced by the
//! backend behind [`Transactions`], never here.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use corebank_core::{AccountId, TransactionId};

/// Signed purpose of a transaction line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinePurpose {
    AchCredit,
    AchDebit,
}

/// One signed amount entry against one account within a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLine {
    pub account_id: AccountId,
    pub purpose: LinePurpose,
    /// Amount in minor currency units.
    pub amount: i64,
}

/// An ordered set of lines posted as a single unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub lines: Vec<TransactionLine>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(lines: Vec<TransactionLine>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: TransactionId::new(),
            lines,
            created_at,
        }
    }
}

/// Posting options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionOptions {
    /// Marks the account-opening funding event. Such a transaction must
    /// reference exactly the newly created account.
    pub initial_deposit: bool,
}

/// Failure posting a transaction.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("backend transport failure: {0}")]
    Transport(String),

    /// The ledger rejected the transaction (e.g. lines violating the
    /// double-entry balance rule).
    #[error("transaction rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// The transaction-posting capability consumed by the account core.
#[async_trait]
pub trait Transactions: Send + Sync {
    async fn create_transaction(
        &self,
        transaction: Transaction,
        options: TransactionOptions,
    ) -> Result<(), TransactionError>;
}

#[async_trait]
impl<T> Transactions for Arc<T>
where
    T: Transactions + ?Sized,
{
    async fn create_transaction(
        &self,
        transaction: Transaction,
        options: TransactionOptions,
    ) -> Result<(), TransactionError> {
        (**self).create_transaction(transaction, options).await
    }
}
