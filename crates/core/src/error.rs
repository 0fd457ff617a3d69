//! Domain errors for the balance rules, defined with thiserror.

use rust_decimal::Decimal;
use thiserror::Error;

/// Core domain errors.
///
/// Only the rules an `Account` can check on its own live here; errors that
/// need the database (missing accounts, ownership) belong to the ledger layer.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid amount: {0} (must be positive)")]
    InvalidAmount(Decimal),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Cannot transfer to the same account: {0}")]
    SameAccountTransfer(i64),
}

/// Result type alias with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, CoreError::InsufficientFunds { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display() {
        let err = CoreError::InsufficientFunds {
            requested: dec!(1000),
            available: dec!(500),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: requested 1000, available 500"
        );

        let err = CoreError::InvalidAmount(dec!(-5));
        assert!(err.to_string().contains("-5"));
    }

    #[test]
    fn test_error_checks() {
        let err = CoreError::InsufficientFunds {
            requested: dec!(100),
            available: dec!(50),
        };
        assert!(err.is_insufficient_funds());
        assert!(!CoreError::SameAccountTransfer(1).is_insufficient_funds());
    }
}
