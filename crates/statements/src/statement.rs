//! Period statements
//!
//! A statement covers `[start, end]` with `end` defaulting to now and
//! `start` to thirty days before `end`, matching what the back office hands
//! to customers.
//!
//! Balance and transaction list are read inside one sqlx transaction, so a
//! statement is a single snapshot: its `ending_balance` always equals the
//! signed sum of the full log at that instant, no matter what writers
//! commit around the read.

use chrono::{DateTime, Duration, Utc};
use corebank_core::{Account, Transaction, TransactionKind};
use corebank_ledger::{LedgerError, LedgerResult};
use corebank_persistence::{AccountRepo, TransactionRepo};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::SqlitePool;

/// Default statement window when `start` is omitted
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// An account statement for one time window.
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub account_id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Newest first
    pub transactions: Vec<Transaction>,
    pub total_deposits: Decimal,
    pub total_withdrawals: Decimal,
    /// The account's balance at query time. This is the live balance, not
    /// a balance reconstructed as of `end`: activity after `end` is
    /// included in this number.
    pub ending_balance: Decimal,
}

/// Derives statements and summaries from the transaction log plus the
/// cached balance.
pub struct StatementAggregator<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StatementAggregator<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &'a SqlitePool {
        self.pool
    }

    /// Build a statement for the window `[start, end]`.
    pub async fn statement(
        &self,
        account_id: i64,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> LedgerResult<Statement> {
        let end = end.unwrap_or_else(Utc::now);
        let start = start.unwrap_or(end - Duration::days(DEFAULT_WINDOW_DAYS));

        // One transaction for both reads: balance and log must come from
        // the same snapshot.
        let mut tx = self.pool.begin().await?;

        let account = AccountRepo::find(&mut *tx, account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))
            .and_then(|row| Account::try_from(row).map_err(Into::into))?;

        let rows =
            TransactionRepo::list_by_account(&mut *tx, account_id, Some(start), Some(end)).await?;

        tx.commit().await?;

        let transactions = rows
            .into_iter()
            .map(|row| Transaction::try_from(row).map_err(LedgerError::from))
            .collect::<LedgerResult<Vec<_>>>()?;

        let mut total_deposits = Decimal::ZERO;
        let mut total_withdrawals = Decimal::ZERO;
        for txn in &transactions {
            match txn.kind {
                TransactionKind::Deposit => total_deposits += txn.amount,
                TransactionKind::Withdrawal => total_withdrawals += txn.amount,
            }
        }

        Ok(Statement {
            account_id,
            start,
            end,
            transactions,
            total_deposits,
            total_withdrawals,
            ending_balance: account.balance,
        })
    }
}
