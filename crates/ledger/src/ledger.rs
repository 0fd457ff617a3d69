//! Account Ledger - single-sided monetary movements
//!
//! Each operation is one unit of work: read the account, apply the balance
//! rule from `corebank-core`, write the new balance and append the
//! transaction row, commit. An error anywhere rolls the whole unit back.

use chrono::Utc;
use corebank_core::{Account, Transaction, TransactionKind};
use corebank_persistence::{AccountRepo, NewTransaction, TransactionRepo};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{LedgerError, LedgerResult};

/// Applies deposits and withdrawals to exactly one account.
pub struct Ledger<'a> {
    pool: &'a SqlitePool,
}

impl<'a> Ledger<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Credit `amount` to the account and append a DEPOSIT transaction.
    pub async fn deposit(
        &self,
        account_id: i64,
        amount: Decimal,
        description: Option<&str>,
    ) -> LedgerResult<Transaction> {
        Account::validate_amount(amount)?;

        let mut tx = self.pool.begin().await?;

        let account = AccountRepo::find(&mut *tx, account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))
            .and_then(|row| Account::try_from(row).map_err(Into::into))?;

        let new_balance = account.credited(amount)?;
        let now = Utc::now();

        AccountRepo::update_balance(&mut *tx, account_id, new_balance, now).await?;

        let record = NewTransaction {
            account_id,
            kind: TransactionKind::Deposit,
            amount,
            description: description.map(ToOwned::to_owned),
        };
        let transaction_id = TransactionRepo::insert(&mut *tx, &record, now).await?;

        tx.commit().await?;

        info!(account_id, %amount, transaction_id, "deposit committed");

        Ok(Transaction {
            id: transaction_id,
            account_id,
            kind: TransactionKind::Deposit,
            amount,
            description: record.description,
            created_at: now,
        })
    }

    /// Debit `amount` from the account and append a WITHDRAWAL transaction.
    ///
    /// Fails with `InsufficientFunds` when `amount` exceeds the current
    /// balance; the account is left untouched and nothing is recorded.
    pub async fn withdraw(
        &self,
        account_id: i64,
        amount: Decimal,
        description: Option<&str>,
    ) -> LedgerResult<Transaction> {
        Account::validate_amount(amount)?;

        let mut tx = self.pool.begin().await?;

        let account = AccountRepo::find(&mut *tx, account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))
            .and_then(|row| Account::try_from(row).map_err(Into::into))?;

        // Solvency is checked against the balance read inside this
        // transaction; the single-connection pool keeps it current.
        let new_balance = account.debited(amount)?;
        let now = Utc::now();

        AccountRepo::update_balance(&mut *tx, account_id, new_balance, now).await?;

        let record = NewTransaction {
            account_id,
            kind: TransactionKind::Withdrawal,
            amount,
            description: description.map(ToOwned::to_owned),
        };
        let transaction_id = TransactionRepo::insert(&mut *tx, &record, now).await?;

        tx.commit().await?;

        info!(account_id, %amount, transaction_id, "withdrawal committed");

        Ok(Transaction {
            id: transaction_id,
            account_id,
            kind: TransactionKind::Withdrawal,
            amount,
            description: record.description,
            created_at: now,
        })
    }
}
