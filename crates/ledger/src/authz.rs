//! Ownership resolution
//!
//! The single authorization capability every caller uses before invoking a
//! ledger operation on a holder's behalf. The core operations themselves
//! stay authorization-agnostic and only re-validate existence.

use corebank_core::Account;
use corebank_persistence::AccountRepo;
use sqlx::SqlitePool;

use crate::error::{LedgerError, LedgerResult};

/// Resolve an account the holder is allowed to operate on.
///
/// A missing row is `AccountNotFound`; a row owned by somebody else is
/// `AccessDenied`.
pub async fn resolve_owned_account(
    pool: &SqlitePool,
    holder_id: i64,
    account_id: i64,
) -> LedgerResult<Account> {
    let row = AccountRepo::find(pool, account_id)
        .await?
        .ok_or(LedgerError::AccountNotFound(account_id))?;

    if row.holder_id != holder_id {
        return Err(LedgerError::AccessDenied(account_id));
    }

    Ok(Account::try_from(row)?)
}
