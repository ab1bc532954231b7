//! Account repository over the external ledger service.

use async_trait::async_trait;
use chrono::SecondsFormat;

use corebank_accounts::{Account, AccountRepository, AccountType, RepositoryError};
use corebank_core::{AccountId, CustomerId, DomainError};

use super::{codec, expect_success, LedgerConnection, RawAccount, RawTransaction, SearchResults};

/// Ledger-backed [`AccountRepository`].
///
/// Every lookup fetches the account metadata record and its line history,
/// then materializes the domain `Account` through the codec. The ledger is
/// the sole authority for concurrent-write ordering; nothing is cached or
/// retried here.
#[derive(Debug, Clone)]
pub struct LedgerAccountRepository {
    conn: LedgerConnection,
}

impl LedgerAccountRepository {
    pub fn new(conn: LedgerConnection) -> Self {
        Self { conn }
    }

    async fn search_raw_accounts(
        &self,
        query: serde_json::Value,
    ) -> Result<Vec<RawAccount>, RepositoryError> {
        let response = self.conn.post_json("/v1/accounts/_search", &query).await?;
        let response = expect_success(response).await?;
        let results: SearchResults<RawAccount> = response
            .json()
            .await
            .map_err(|e| RepositoryError::Decode(e.to_string()))?;
        Ok(results.results)
    }

    /// Fetch the full line history for one account.
    async fn fetch_lines(&self, account_id: &str) -> Result<Vec<RawTransaction>, RepositoryError> {
        let query = serde_json::json!({
            "query": { "must": { "terms": [ { "account": [account_id] } ] } }
        });
        let response = self
            .conn
            .post_json("/v1/transactions/_search", &query)
            .await?;
        let response = expect_success(response).await?;
        let results: SearchResults<RawTransaction> = response
            .json()
            .await
            .map_err(|e| RepositoryError::Decode(e.to_string()))?;
        Ok(results.results)
    }

    async fn materialize_all(
        &self,
        raw_accounts: Vec<RawAccount>,
    ) -> Result<Vec<Account>, RepositoryError> {
        let mut accounts = Vec::with_capacity(raw_accounts.len());
        for raw in raw_accounts {
            let lines = self.fetch_lines(&raw.id).await?;
            accounts.push(materialize_account(raw, &lines)?);
        }
        Ok(accounts)
    }
}

fn decode(e: DomainError) -> RepositoryError {
    RepositoryError::Decode(e.to_string())
}

/// Materialize a domain `Account` from a raw metadata record and its lines.
///
/// Settled lines sum into the settled balance, pending lines into the
/// in-flight balance, and holds reduce what is spendable now. Timestamps come
/// from the metadata record, never from lines (lines may post after
/// creation).
pub(crate) fn materialize_account(
    raw: RawAccount,
    transactions: &[RawTransaction],
) -> Result<Account, RepositoryError> {
    let id: AccountId = raw.id.parse().map_err(decode)?;
    let customer_id = CustomerId::parse(&raw.data.customer_id).map_err(decode)?;
    let account_type: AccountType = raw.data.account_type.parse().map_err(decode)?;

    let mut balance = 0i64;
    let mut balance_pending = 0i64;
    let mut holds = 0i64;
    for transaction in transactions {
        for line in transaction.lines.iter().filter(|l| l.account == raw.id) {
            let amount = codec::parse_balance(&line.delta);
            match line.state.as_str() {
                "pending" => balance_pending += amount,
                "hold" => holds += amount,
                _ => balance += amount,
            }
        }
    }

    let closed_at = if raw.data.closed_at.is_empty() {
        None
    } else {
        Some(codec::parse_time(&raw.data.closed_at))
    };

    Ok(Account {
        id,
        customer_id,
        name: raw.data.name,
        account_number: raw.data.account_number,
        routing_number: raw.data.routing_number,
        status: raw.data.status,
        account_type,
        balance,
        balance_pending,
        balance_available: balance - holds,
        created_at: codec::parse_time(&raw.data.created_at),
        last_modified: codec::parse_time(&raw.data.last_modified),
        closed_at,
    })
}

#[async_trait]
impl AccountRepository for LedgerAccountRepository {
    async fn create_account(
        &self,
        customer_id: &CustomerId,
        account: &Account,
    ) -> Result<(), RepositoryError> {
        let mut data = serde_json::json!({
            "customerId": customer_id.as_str(),
            "name": account.name,
            "accountNumber": account.account_number,
            "routingNumber": account.routing_number,
            "status": account.status,
            "type": account.account_type.as_str(),
            "createdAt": account.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            "lastModified": account.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true),
        });
        if let Some(closed_at) = account.closed_at {
            data["closedAt"] =
                serde_json::Value::from(closed_at.to_rfc3339_opts(SecondsFormat::Secs, true));
        }

        let body = serde_json::json!({ "id": account.id.to_string(), "data": data });
        let response = self.conn.post_json("/v1/accounts", &body).await?;
        expect_success(response).await?;
        Ok(())
    }

    async fn get_accounts(&self, ids: &[AccountId]) -> Result<Vec<Account>, RepositoryError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        let query = serde_json::json!({
            "query": { "must": { "terms": [ { "id": ids } ] } }
        });
        let raw = self.search_raw_accounts(query).await?;
        self.materialize_all(raw).await
    }

    async fn search_accounts_by_customer_id(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<Account>, RepositoryError> {
        let query = serde_json::json!({
            "query": { "must": { "fields": [ { "customerId": { "eq": customer_id.as_str() } } ] } }
        });
        let raw = self.search_raw_accounts(query).await?;
        self.materialize_all(raw).await
    }

    async fn search_accounts_by_routing_number(
        &self,
        account_number: &str,
        routing_number: &str,
        account_type: AccountType,
    ) -> Result<Option<Account>, RepositoryError> {
        let query = serde_json::json!({
            "query": { "must": { "fields": [
                { "accountNumber": { "eq": account_number } },
                { "routingNumber": { "eq": routing_number } },
                { "type": { "eq": account_type.as_str() } },
            ] } }
        });
        let mut raw = self.search_raw_accounts(query).await?;
        match raw.len() {
            0 => Ok(None),
            1 => {
                let raw = raw.remove(0);
                let lines = self.fetch_lines(&raw.id).await?;
                Ok(Some(materialize_account(raw, &lines)?))
            }
            matches => Err(RepositoryError::AmbiguousMatch {
                account_number: account_number.to_string(),
                matches,
            }),
        }
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        let response = self.conn.get("/ping").await?;
        expect_success(response).await?;
        Ok(())
    }

    /// No-op: the connection holds no resources beyond the shared HTTP pool.
    async fn close(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{RawAccountData, RawLine};
    use super::*;

    fn raw_account(id: &AccountId) -> RawAccount {
        RawAccount {
            id: id.to_string(),
            data: RawAccountData {
                customer_id: "cust-1".to_string(),
                name: "example account".to_string(),
                account_number: "18497584".to_string(),
                routing_number: "121042882".to_string(),
                status: "Active".to_string(),
                account_type: "Checking".to_string(),
                created_at: "2019-01-02T15:04:05Z".to_string(),
                last_modified: "2019-01-03T08:00:00Z".to_string(),
                closed_at: String::new(),
            },
        }
    }

    fn line(account: &str, delta: &str, state: &str) -> RawLine {
        RawLine {
            account: account.to_string(),
            delta: delta.to_string(),
            state: state.to_string(),
        }
    }

    #[test]
    fn balances_aggregate_by_settlement_state() {
        let id = AccountId::new();
        let key = id.to_string();
        let transactions = vec![
            RawTransaction {
                lines: vec![line(&key, "100", ""), line(&key, "50", "settled")],
            },
            RawTransaction {
                lines: vec![line(&key, "123", "pending"), line(&key, "40", "hold")],
            },
            // Lines against other accounts are never attributed here.
            RawTransaction {
                lines: vec![line("someone-else", "999", "")],
            },
        ];

        let account = materialize_account(raw_account(&id), &transactions).unwrap();
        assert_eq!(account.balance, 150);
        assert_eq!(account.balance_pending, 123);
        assert_eq!(account.balance_available, 110);
        assert_eq!(account.account_type, AccountType::Checking);
        assert_eq!(account.status, "Active");
    }

    #[test]
    fn timestamps_come_from_metadata_not_lines() {
        let id = AccountId::new();
        let account = materialize_account(raw_account(&id), &[]).unwrap();
        assert_eq!(
            account.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            "2019-01-02T15:04:05Z"
        );
        assert_eq!(
            account.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true),
            "2019-01-03T08:00:00Z"
        );
        assert_eq!(account.closed_at, None);
    }

    #[test]
    fn malformed_line_amounts_degrade_to_zero_without_failing_the_read() {
        let id = AccountId::new();
        let key = id.to_string();
        let transactions = vec![RawTransaction {
            lines: vec![line(&key, "asas", ""), line(&key, "100", "")],
        }];

        let account = materialize_account(raw_account(&id), &transactions).unwrap();
        assert_eq!(account.balance, 100);
    }

    #[test]
    fn unparseable_identity_is_a_decode_error() {
        let mut raw = raw_account(&AccountId::new());
        raw.id = "not-a-uuid".to_string();
        let err = materialize_account(raw, &[]).unwrap_err();
        assert!(matches!(err, RepositoryError::Decode(_)));
    }
}
