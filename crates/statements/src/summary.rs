//! Account summaries
//!
//! The quick view: current balance, all-time activity counts, and how many
//! of the last ten slots are filled. All four reads share one sqlx
//! transaction so the counts always describe the same state as the balance.

use chrono::{DateTime, Utc};
use corebank_core::{Account, AccountType, TransactionKind};
use corebank_ledger::{LedgerError, LedgerResult};
use corebank_persistence::{AccountRepo, TransactionRepo};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::statement::StatementAggregator;

/// Recent-transaction cap reported by the summary
pub const RECENT_LIMIT: i64 = 10;

/// Point-in-time account overview.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub account_id: i64,
    pub account_type: AccountType,
    pub current_balance: Decimal,
    /// Count of the most recent transactions, at most [`RECENT_LIMIT`]
    pub recent_transactions: i64,
    pub deposit_count: i64,
    pub withdrawal_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<'a> StatementAggregator<'a> {
    /// Build the summary for one account.
    pub async fn summary(&self, account_id: i64) -> LedgerResult<AccountSummary> {
        let mut tx = self.pool().begin().await?;

        let account = AccountRepo::find(&mut *tx, account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))
            .and_then(|row| Account::try_from(row).map_err(Into::into))?;

        let deposit_count =
            TransactionRepo::count_by_kind(&mut *tx, account_id, TransactionKind::Deposit).await?;
        let withdrawal_count =
            TransactionRepo::count_by_kind(&mut *tx, account_id, TransactionKind::Withdrawal)
                .await?;
        let recent_transactions =
            TransactionRepo::recent_count(&mut *tx, account_id, RECENT_LIMIT).await?;

        tx.commit().await?;

        Ok(AccountSummary {
            account_id,
            account_type: account.account_type,
            current_balance: account.balance,
            recent_transactions,
            deposit_count,
            withdrawal_count,
            created_at: account.created_at,
            updated_at: account.updated_at,
        })
    }
}
