//! # Transaction Module
//!
//! A `Transaction` is an immutable fact: once the ledger commits it, it is
//! never mutated or deleted. A transfer between accounts is represented as
//! a paired WITHDRAWAL on the source and DEPOSIT on the destination, not as
//! a transaction kind of its own.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction kind (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    /// Code string stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdrawal => "WITHDRAWAL",
        }
    }

    /// Parse from the stored code string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DEPOSIT" => Some(TransactionKind::Deposit),
            "WITHDRAWAL" => Some(TransactionKind::Withdrawal),
            _ => None,
        }
    }

    /// Sign applied to the amount when reconstructing a balance
    pub fn sign(&self) -> Decimal {
        match self {
            TransactionKind::Deposit => Decimal::ONE,
            TransactionKind::Withdrawal => Decimal::NEGATIVE_ONE,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A committed money movement against one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Monotonically increasing row id assigned by the database
    pub id: i64,
    /// Owning account; immutable after creation
    pub account_id: i64,
    pub kind: TransactionKind,
    /// Strictly positive; the kind carries the direction
    pub amount: Decimal,
    pub description: Option<String>,
    /// Server-assigned commit timestamp
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Amount with the kind's sign applied (deposits +, withdrawals -).
    pub fn signed_amount(&self) -> Decimal {
        self.kind.sign() * self.amount
    }

    /// Sum of signed amounts, i.e. the balance these transactions add up to.
    pub fn net_total<'a, I>(transactions: I) -> Decimal
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions
            .into_iter()
            .map(Transaction::signed_amount)
            .sum()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TXN {} [{}] account {} amount {}",
            self.id, self.kind, self.account_id, self.amount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn txn(id: i64, kind: TransactionKind, amount: Decimal) -> Transaction {
        Transaction {
            id,
            account_id: 1,
            kind,
            amount,
            description: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_kind_roundtrip() {
        assert_eq!(
            TransactionKind::parse("DEPOSIT"),
            Some(TransactionKind::Deposit)
        );
        assert_eq!(
            TransactionKind::parse("withdrawal"),
            Some(TransactionKind::Withdrawal)
        );
        assert_eq!(TransactionKind::parse("TRANSFER"), None);
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(
            txn(1, TransactionKind::Deposit, dec!(1000)).signed_amount(),
            dec!(1000)
        );
        assert_eq!(
            txn(2, TransactionKind::Withdrawal, dec!(200)).signed_amount(),
            dec!(-200)
        );
    }

    #[test]
    fn test_net_total_matches_balance() {
        let log = vec![
            txn(1, TransactionKind::Deposit, dec!(1000)),
            txn(2, TransactionKind::Withdrawal, dec!(200)),
            txn(3, TransactionKind::Withdrawal, dec!(300)),
        ];
        assert_eq!(Transaction::net_total(&log), dec!(500));
    }

    #[test]
    fn test_net_total_empty() {
        assert_eq!(Transaction::net_total(&[]), dec!(0));
    }
}
