//! Ledger operation errors
//!
//! Business rejections (invalid amount, insufficient funds, ownership) are
//! distinct variants the caller can act on; infrastructure failures are
//! collapsed into `TransferFailed` / `OperationFailed` so internal detail
//! does not leak. None of these are fatal to the process.

use corebank_core::CoreError;
use corebank_persistence::PersistenceError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors surfaced by ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid amount: {0} (must be positive)")]
    InvalidAmount(Decimal),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Cannot transfer to the same account: {0}")]
    SameAccountTransfer(i64),

    #[error("Account not found: {0}")]
    AccountNotFound(i64),

    #[error("Access denied to account: {0}")]
    AccessDenied(i64),

    /// Commit-phase failure after all preconditions passed. The whole
    /// operation was rolled back; retrying the transfer is safe.
    #[error("Transfer failed due to a storage error")]
    TransferFailed(#[source] PersistenceError),

    #[error("Operation failed due to a storage error")]
    OperationFailed(#[from] PersistenceError),
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    /// Business rejection as opposed to a system fault.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            LedgerError::TransferFailed(_) | LedgerError::OperationFailed(_)
        )
    }
}

impl From<CoreError> for LedgerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidAmount(amount) => LedgerError::InvalidAmount(amount),
            CoreError::InsufficientFunds {
                requested,
                available,
            } => LedgerError::InsufficientFunds {
                requested,
                available,
            },
            CoreError::SameAccountTransfer(id) => LedgerError::SameAccountTransfer(id),
        }
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        LedgerError::OperationFailed(PersistenceError::Database(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_core_error_mapping() {
        let err: LedgerError = CoreError::InsufficientFunds {
            requested: dec!(100),
            available: dec!(20),
        }
        .into();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        assert!(err.is_rejection());
    }

    #[test]
    fn test_storage_errors_are_not_rejections() {
        let err: LedgerError = sqlx::Error::PoolClosed.into();
        assert!(!err.is_rejection());
    }
}
