//! Transaction Log queries
//!
//! The `transactions` table is append-only; rows are written exclusively by
//! [`crate::Ledger`] and [`crate::TransferOrchestrator`] inside their units
//! of work. This module is the read side.

use chrono::{DateTime, Utc};
use corebank_core::Transaction;
use corebank_persistence::{AccountRepo, TransactionRepo};
use sqlx::SqlitePool;

use crate::error::{LedgerError, LedgerResult};

/// Read access to the append-only transaction log.
pub struct TransactionLog<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TransactionLog<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Transactions for one account, newest first (`created_at DESC`, ties
    /// broken by descending id). `from`/`to` bound `created_at` when given;
    /// omitted bounds mean all time.
    pub async fn list(
        &self,
        account_id: i64,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> LedgerResult<Vec<Transaction>> {
        if AccountRepo::find(self.pool, account_id).await?.is_none() {
            return Err(LedgerError::AccountNotFound(account_id));
        }

        let rows = TransactionRepo::list_by_account(self.pool, account_id, from, to).await?;
        rows.into_iter()
            .map(|row| Transaction::try_from(row).map_err(Into::into))
            .collect()
    }
}
