//! Textual balance/time decoding for ledger records.
//!
//! The ledger backend returns balances and timestamps as strings. Isolating
//! the parsing here lets every call site treat "missing data" as a single
//! sentinel instead of propagating backend-specific errors: the ledger is the
//! durable source of truth, and a transient parse miss must not abort an
//! otherwise-valid read.

use chrono::{DateTime, Utc};

/// Parse a decimal amount in minor currency units.
///
/// Any failure (empty, non-numeric, overflow) yields `0`. This is a
/// deliberate best-effort degradation, not silent data loss.
pub fn parse_balance(text: &str) -> i64 {
    text.parse::<i64>().unwrap_or(0)
}

/// Parse an RFC 3339 timestamp.
///
/// Malformed input yields the Unix-epoch sentinel, which callers can observe
/// as a "zero" instant. Never panics.
pub fn parse_time(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
