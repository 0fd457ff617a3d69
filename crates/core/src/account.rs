//! # Account Module
//!
//! An `Account` is a monetary store owned by exactly one `AccountHolder`.
//! The cached `balance` is a materialized view over the transaction log:
//! it must always equal the sum of signed transaction amounts, and the
//! ledger layer commits a balance update together with its transaction row.
//!
//! The arithmetic and the solvency check live here so they can be tested
//! without a database; applying the result atomically is the ledger's job.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account type (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    /// Code string stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "CHECKING",
            AccountType::Savings => "SAVINGS",
        }
    }

    /// Parse from the stored code string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "CHECKING" => Some(AccountType::Checking),
            "SAVINGS" => Some(AccountType::Savings),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A holder's account.
///
/// Invariant: `balance` is non-negative after any committed operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Row id assigned by the database
    pub id: i64,
    /// Owning holder; immutable after creation
    pub holder_id: i64,
    pub account_type: AccountType,
    /// Current balance, cached running total of the transaction log
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Validate an operation amount: deposits and withdrawals must move a
    /// strictly positive amount.
    pub fn validate_amount(amount: Decimal) -> CoreResult<()> {
        if amount <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(amount));
        }
        Ok(())
    }

    /// Balance after crediting `amount`.
    pub fn credited(&self, amount: Decimal) -> CoreResult<Decimal> {
        Self::validate_amount(amount)?;
        Ok(self.balance + amount)
    }

    /// Balance after debiting `amount`, enforcing solvency against the
    /// current (pre-operation) balance.
    pub fn debited(&self, amount: Decimal) -> CoreResult<Decimal> {
        Self::validate_amount(amount)?;
        if amount > self.balance {
            return Err(CoreError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        Ok(self.balance - amount)
    }

    /// Whether a withdrawal of `amount` would pass the solvency check.
    pub fn can_withdraw(&self, amount: Decimal) -> bool {
        amount > Decimal::ZERO && amount <= self.balance
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account {} ({}, holder {}, balance {})",
            self.id, self.account_type, self.holder_id, self.balance
        )
    }
}
