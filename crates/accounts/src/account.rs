//! The `Account` read-time projection and its value types.

use chrono::{DateTime, Utc};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use corebank_core::{AccountId, CustomerId, DomainError};

/// Initial status stamped on newly opened accounts.
///
/// Status is free-form on the wire (backends report values like `"open"` or
/// `"Active"`); only creation pins a concrete value.
pub const STATUS_OPEN: &str = "open";

/// Product type of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
        }
    }
}

impl core::fmt::Display for AccountType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = DomainError;

    /// Case-normalizing parse: `"Checking"` and `"checking"` are the same type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "checking" => Ok(AccountType::Checking),
            "savings" => Ok(AccountType::Savings),
            other => Err(DomainError::validation(format!(
                "unknown account type: {other:?}"
            ))),
        }
    }
}

/// A customer account, projected at read time from the ledger backend.
///
/// The ledger is the source of truth; this record is a materialization of the
/// account's metadata plus its line history. The three balance fields are
/// independently derived and may diverge (settled, in-flight, spendable-now).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub customer_id: CustomerId,
    pub name: String,
    /// Synthetic numeric account number; not guaranteed globally unique by
    /// construction (uniqueness is backend-defined).
    pub account_number: String,
    pub routing_number: String,
    pub status: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Settled balance in minor currency units.
    pub balance: i64,
    /// In-flight balance in minor currency units.
    pub balance_pending: i64,
    /// Settled balance minus active holds, in minor currency units.
    pub balance_available: i64,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}
