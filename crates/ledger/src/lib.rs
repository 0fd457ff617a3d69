//! # Corebank Ledger
//!
//! The invariant-preserving core: every mutation commits a balance update
//! together with its transaction row in one sqlx transaction, so the cached
//! balance always equals the sum of signed amounts in the log.
//!
//! - [`Ledger`] applies single-sided movements (deposit, withdraw).
//! - [`TransferOrchestrator`] moves money between two accounts atomically.
//! - [`TransactionLog`] answers ordered, windowed history queries.
//! - [`resolve_owned_account`] is the ownership gate callers run before
//!   invoking the core on a holder's behalf.
//!
//! Concurrency: the persistence pool is capped at one connection, so
//! conflicting operations queue and the solvency check can never act on a
//! stale balance.

pub mod authz;
pub mod error;
pub mod ledger;
pub mod log;
pub mod transfer;

pub use authz::resolve_owned_account;
pub use error::{LedgerError, LedgerResult};
pub use ledger::Ledger;
pub use log::TransactionLog;
pub use transfer::{TransferOrchestrator, TransferReceipt};
