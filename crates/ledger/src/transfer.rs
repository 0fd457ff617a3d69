//! Transfer Orchestrator
//!
//! Moves a positive amount between two accounts of the same holder as one
//! unit of work: debit plus WITHDRAWAL row, credit plus DEPOSIT row, all in
//! a single sqlx transaction. Readers see the transfer fully applied or not
//! at all.
//!
//! Preconditions are checked in a fixed order and the first failure wins:
//! distinct accounts, positive amount, ownership of both sides, solvency.
//! A failure after that point rolls everything back and is reported as
//! `TransferFailed`, which is safe to retry.

use chrono::{DateTime, Utc};
use corebank_core::{Account, TransactionKind};
use corebank_persistence::{AccountRepo, NewTransaction, TransactionRepo};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::authz::resolve_owned_account;
use crate::error::{LedgerError, LedgerResult};

/// Outcome of a committed transfer. `transaction_id` identifies the debit
/// (WITHDRAWAL) row; both legs share `created_at`.
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    pub transaction_id: i64,
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Coordinates two ledger mutations as one indivisible unit.
pub struct TransferOrchestrator<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TransferOrchestrator<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Transfer `amount` from one of the holder's accounts to another.
    pub async fn transfer(
        &self,
        holder_id: i64,
        from_account_id: i64,
        to_account_id: i64,
        amount: Decimal,
        description: Option<&str>,
    ) -> LedgerResult<TransferReceipt> {
        if from_account_id == to_account_id {
            return Err(LedgerError::SameAccountTransfer(from_account_id));
        }
        Account::validate_amount(amount)?;

        resolve_owned_account(self.pool, holder_id, from_account_id).await?;
        resolve_owned_account(self.pool, holder_id, to_account_id).await?;

        match self
            .commit(from_account_id, to_account_id, amount, description)
            .await
        {
            Ok(receipt) => {
                info!(
                    from_account_id,
                    to_account_id,
                    %amount,
                    transaction_id = receipt.transaction_id,
                    "transfer committed"
                );
                Ok(receipt)
            }
            // Solvency is re-checked against the balances read inside the
            // transaction, so that rejection passes through unchanged;
            // everything else at this stage is an infrastructure fault.
            Err(err @ LedgerError::InsufficientFunds { .. }) => Err(err),
            Err(LedgerError::OperationFailed(source)) => {
                warn!(from_account_id, to_account_id, %source, "transfer rolled back");
                Err(LedgerError::TransferFailed(source))
            }
            Err(err) => Err(err),
        }
    }

    async fn commit(
        &self,
        from_account_id: i64,
        to_account_id: i64,
        amount: Decimal,
        description: Option<&str>,
    ) -> LedgerResult<TransferReceipt> {
        let mut tx = self.pool.begin().await?;

        // Both accounts are read and written in ascending id order so two
        // opposite transfers over the same pair never acquire in conflicting
        // order.
        let mut ordered = [from_account_id, to_account_id];
        ordered.sort_unstable();

        let mut accounts = Vec::with_capacity(2);
        for id in ordered {
            let account = AccountRepo::find(&mut *tx, id)
                .await?
                .ok_or(LedgerError::AccountNotFound(id))
                .and_then(|row| Account::try_from(row).map_err(Into::into))?;
            accounts.push(account);
        }

        let from_balance = balance_of(&accounts, from_account_id);
        let to_balance = balance_of(&accounts, to_account_id);

        if amount > from_balance {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available: from_balance,
            });
        }

        let now = Utc::now();
        let note = description.unwrap_or("Money transfer");

        for id in ordered {
            let balance = if id == from_account_id {
                from_balance - amount
            } else {
                to_balance + amount
            };
            AccountRepo::update_balance(&mut *tx, id, balance, now).await?;
        }

        let debit = NewTransaction {
            account_id: from_account_id,
            kind: TransactionKind::Withdrawal,
            amount,
            description: Some(format!("Transfer to account {to_account_id}: {note}")),
        };
        let debit_id = TransactionRepo::insert(&mut *tx, &debit, now).await?;

        let credit = NewTransaction {
            account_id: to_account_id,
            kind: TransactionKind::Deposit,
            amount,
            description: Some(format!("Transfer from account {from_account_id}: {note}")),
        };
        TransactionRepo::insert(&mut *tx, &credit, now).await?;

        tx.commit().await?;

        Ok(TransferReceipt {
            transaction_id: debit_id,
            from_account_id,
            to_account_id,
            amount,
            created_at: now,
        })
    }
}

fn balance_of(accounts: &[Account], id: i64) -> Decimal {
    accounts
        .iter()
        .find(|a| a.id == id)
        .map(|a| a.balance)
        .unwrap_or(Decimal::ZERO)
}
