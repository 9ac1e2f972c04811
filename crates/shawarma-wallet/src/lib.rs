use std::convert::Infallible;

use rust_decimal::Decimal;
use shawarma_core::Transaction;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("top-up amount must be positive")]
    InvalidAmount,
    #[error("wallet top-up is not available yet")]
    TopUpUnavailable,
}

/// Vendor wallet entries in the order they were recorded.
#[derive(Debug, Clone, Default)]
pub struct WalletLedger {
    entries: Vec<Transaction>,
}

impl WalletLedger {
    pub fn new(entries: Vec<Transaction>) -> Self {
        Self { entries }
    }

    /// Newest first.
    pub fn statement(&self, vendor_id: &str) -> Vec<Transaction> {
        let mut rows: Vec<Transaction> = self
            .entries
            .iter()
            .filter(|entry| entry.vendor_id == vendor_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows
    }

    pub fn recent(&self, vendor_id: &str, limit: usize) -> Vec<Transaction> {
        let mut rows = self.statement(vendor_id);
        rows.truncate(limit);
        rows
    }

    pub fn net_flow(&self, vendor_id: &str) -> Decimal {
        self.entries
            .iter()
            .filter(|entry| entry.vendor_id == vendor_id)
            .map(Transaction::signed_amount)
            .sum()
    }
}

/// Card top-ups go through a payment provider that is not wired in, so this
/// can only explain why the top-up was refused.
pub fn request_top_up(amount: Decimal) -> Result<Infallible, WalletError> {
    if amount <= Decimal::ZERO {
        return Err(WalletError::InvalidAmount);
    }
    Err(WalletError::TopUpUnavailable)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use shawarma_core::TransactionKind;

    use super::*;

    fn entry(
        id: &str,
        vendor_id: &str,
        day: u32,
        cents: i64,
        kind: TransactionKind,
    ) -> Transaction {
        Transaction {
            id: id.to_string(),
            vendor_id: vendor_id.to_string(),
            date: Utc.with_ymd_and_hms(2023, 10, day, 0, 0, 0).unwrap(),
            description: format!("entry {id}"),
            amount: Decimal::new(cents, 2),
            kind,
        }
    }

    fn ledger() -> WalletLedger {
        WalletLedger::new(vec![
            entry("t3", "vendor1", 5, 5000, TransactionKind::Credit),
            entry("t1", "vendor1", 20, 50000, TransactionKind::Credit),
            entry("t9", "vendor2", 21, 1000, TransactionKind::Debit),
            entry("t2", "vendor1", 10, 32000, TransactionKind::Debit),
        ])
    }

    #[test]
    fn statement_is_scoped_and_newest_first() {
        let ids: Vec<_> = ledger()
            .statement("vendor1")
            .into_iter()
            .map(|tx| tx.id)
            .collect();
        assert_eq!(ids, vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn recent_truncates() {
        assert_eq!(ledger().recent("vendor1", 2).len(), 2);
        assert!(ledger().recent("vendor3", 5).is_empty());
    }

    #[test]
    fn net_flow_signs_debits() {
        assert_eq!(ledger().net_flow("vendor1"), Decimal::new(23000, 2));
        assert_eq!(ledger().net_flow("vendor2"), Decimal::new(-1000, 2));
    }

    #[test]
    fn top_up_is_a_stub() {
        assert_eq!(
            request_top_up(Decimal::ZERO).unwrap_err(),
            WalletError::InvalidAmount
        );
        assert_eq!(
            request_top_up(Decimal::from(100)).unwrap_err(),
            WalletError::TopUpUnavailable
        );
    }
}
