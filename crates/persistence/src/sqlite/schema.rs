//! Database schema row types
//!
//! Row types for sqlx mapping from the SQLite tables created in
//! `repos::create_schema`. Decimals travel as TEXT; the `TryFrom`
//! conversions parse them into domain types and reject unknown enum codes.

use chrono::{DateTime, Utc};
use corebank_core::{
    Account, AccountHolder, AccountType, Card, CardBrand, Role, Transaction, TransactionKind,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PersistenceError;

/// Row type for the `account_holders` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct HolderRow {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Row type for the `accounts` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AccountRow {
    pub id: i64,
    pub holder_id: i64,
    pub account_type: String,
    pub balance: String, // Decimal stored as TEXT
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Row type for the `transactions` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TransactionRow {
    pub id: i64,
    pub account_id: i64,
    pub kind: String,
    pub amount: String, // Decimal stored as TEXT
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row type for the `cards` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CardRow {
    pub id: i64,
    pub account_id: i64,
    pub holder_id: i64,
    pub masked_number: String,
    pub brand: String,
    pub last4: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

// === Conversion implementations ===

fn parse_decimal(field: &str, value: &str) -> Result<Decimal, PersistenceError> {
    Decimal::from_str(value)
        .map_err(|_| PersistenceError::InvalidDecimal(format!("{field} = {value}")))
}

fn invalid_enum(field: &str, value: &str) -> PersistenceError {
    PersistenceError::InvalidEnumValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

impl TryFrom<HolderRow> for AccountHolder {
    type Error = PersistenceError;

    fn try_from(row: HolderRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role).ok_or_else(|| invalid_enum("role", &row.role))?;
        Ok(AccountHolder {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            password_hash: row.password_hash,
            role,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<AccountRow> for Account {
    type Error = PersistenceError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let account_type = AccountType::parse(&row.account_type)
            .ok_or_else(|| invalid_enum("account_type", &row.account_type))?;
        let balance = parse_decimal("balance", &row.balance)?;
        Ok(Account {
            id: row.id,
            holder_id: row.holder_id,
            account_type,
            balance,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = PersistenceError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let kind =
            TransactionKind::parse(&row.kind).ok_or_else(|| invalid_enum("kind", &row.kind))?;
        let amount = parse_decimal("amount", &row.amount)?;
        Ok(Transaction {
            id: row.id,
            account_id: row.account_id,
            kind,
            amount,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<CardRow> for Card {
    type Error = PersistenceError;

    fn try_from(row: CardRow) -> Result<Self, Self::Error> {
        let brand = CardBrand::parse(&row.brand).ok_or_else(|| invalid_enum("brand", &row.brand))?;
        Ok(Card {
            id: row.id,
            account_id: row.account_id,
            holder_id: row.holder_id,
            masked_number: row.masked_number,
            brand,
            last4: row.last4,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
